#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod slug;
mod trace;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::Extension;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use error::AppError;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This contains every dependency handlers need access to: the database
/// connection pool and the password hash configuration. It is constructed
/// once at startup and shared by reference across request-handling tasks,
/// never mutated afterwards.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
}

/// Builds the application router and its OpenAPI document.
fn app(state: AppState) -> axum::Router {
	let mut api = OpenApi::default();

	let router = ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/posts", route::post::routes())
		.nest("/users", route::user::routes())
		.nest("/tags", route::tag::routes())
		.nest("/search", route::search::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs);

	router
		.layer(
			ServiceBuilder::new()
				.layer(Extension(Arc::new(api)))
				.layer(TraceLayer::new_for_http())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let _guard = trace::init_tracing_subscriber();

	let database = Database::connect(
		&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
	)
	.await
	.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let state = State {
		database,
		hasher: Argon2::default(),
	};

	let governor = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&governor]);

	let app = app(state).layer(GovernorLayer { config: governor });

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
pub mod test {
	pub use serde_json::json;
	pub use uuid::Uuid;

	pub use crate::Database;

	use axum_test::{TestServer, TestServerConfig};

	/// Builds a test server over the full router, persisting cookies
	/// between requests so session auth behaves like a browser tab.
	pub fn app(database: Database) -> TestServer {
		let state = crate::State {
			database,
			hasher: argon2::Argon2::default(),
		};

		TestServer::new_with_config(
			crate::app(state),
			TestServerConfig {
				save_cookies: true,
				..TestServerConfig::default()
			},
		)
		.unwrap()
	}

	/// Registers a fresh account on this server's cookie jar and returns
	/// the new user's id.
	pub async fn register(server: &TestServer, email: &str, name: &str) -> Uuid {
		let response = server
			.post("/auth/register")
			.json(&json!({
				"email": email,
				"password": "hunter2hunter",
				"name": name,
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let me = server.get("/auth/me").await;

		me.json::<serde_json::Value>()["id"]
			.as_str()
			.and_then(|id| id.parse().ok())
			.expect("registered user has an id")
	}

	/// Creates a post through the API and returns its slug.
	pub async fn create_post(
		server: &TestServer,
		title: &str,
		published: bool,
		tags: &[&str],
	) -> String {
		let response = server
			.post("/posts")
			.json(&json!({
				"title": title,
				"content": "lorem ipsum dolor sit amet",
				"tags": tags,
				"published": published,
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		response.json::<serde_json::Value>()["post"]["slug"]
			.as_str()
			.expect("created post has a slug")
			.to_owned()
	}
}
