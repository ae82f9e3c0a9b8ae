use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::{
	body::Body,
	http::{Response, StatusCode},
	response::IntoResponse,
};

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("email already taken")]
	EmailTaken,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/register", post_with(register, register_docs))
		.api_route(
			"/me",
			get_with(get_me, get_me_docs).put_with(update_me, update_me_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::EmailTaken => StatusCode::CONFLICT,
			Self::Argon(..) | Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let content = match self {
			Self::InvalidEmailOrPassword => "invalid_email_or_password",
			Self::NoSessionCookie => "no_session_cookie",
			Self::InvalidSessionCookie => "invalid_session_cookie",
			Self::EmailTaken => "email_taken",
			Self::Argon(..) | Self::Database(..) => "internal_server_error",
		};

		error::Message::new(content).into_vec()
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		error::ErrorShape::into_response(&self)
	}
}

impl aide::OperationOutput for Error {
	type Inner = Self;
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
				"name": "John",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["name"], "John");
	}

	#[sqlx::test]
	async fn test_register_duplicate_email(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
				"name": "Impostor",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_logout_invalidates_session(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let response = app.get("/auth/logout").await;

		assert_eq!(response.status_code(), 204);

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_update_profile(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let response = app
			.put("/auth/me")
			.json(&json!({ "bio": "Writes about Rust." }))
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["bio"], "Writes about Rust.");
		assert_eq!(body["name"], "John");
	}
}
