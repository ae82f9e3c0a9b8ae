use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::{
	body::Body,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur while working with profiles and follows.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("cannot follow yourself")]
	SelfFollow,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/:id", get_with(get_user, get_user_docs))
		.api_route(
			"/:id/follow",
			get_with(get_follow_status, get_follow_status_docs)
				.post_with(toggle_follow, toggle_follow_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::SelfFollow => StatusCode::BAD_REQUEST,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownUser(id) => error::Message::new("unknown_user")
				.detail("id", id.to_string())
				.into_vec(),
			Self::SelfFollow => error::Message::new("cannot_follow_self").into_vec(),
			Self::Database(..) => error::Message::new("internal_server_error").into_vec(),
		}
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
	async fn test_follow_toggle(pool: Database) {
		let follower = app(pool.clone());
		let author = app(pool);

		let author_id = register(&author, "jane@smith.com", "Jane").await;

		register(&follower, "john@smith.com", "John").await;

		let response = follower.post(&format!("/users/{author_id}/follow")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["following"], true);

		let response = follower.get(&format!("/users/{author_id}/follow")).await;

		assert_eq!(response.json::<serde_json::Value>()["following"], true);

		let response = follower.get(&format!("/users/{author_id}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["user"]["_count"]["followers"],
			1
		);

		let response = follower.post(&format!("/users/{author_id}/follow")).await;

		assert_eq!(response.json::<serde_json::Value>()["following"], false);

		let response = follower.get(&format!("/users/{author_id}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["user"]["_count"]["followers"],
			0
		);
	}

	#[sqlx::test]
	async fn test_follow_self(pool: Database) {
		let app = app(pool);

		let id = register(&app, "john@smith.com", "John").await;

		let response = app.post(&format!("/users/{id}/follow")).await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_follow_status_anonymous(pool: Database) {
		let registered = app(pool.clone());
		let anonymous = app(pool);

		let id = register(&registered, "john@smith.com", "John").await;

		let response = anonymous.get(&format!("/users/{id}/follow")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["following"], false);
	}

	#[sqlx::test]
	async fn test_follow_unknown_user(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let response = app.post(&format!("/users/{}/follow", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_profile_counts(pool: Database) {
		let app = app(pool);

		let id = register(&app, "john@smith.com", "John").await;

		create_post(&app, "Published", true, &[]).await;
		create_post(&app, "Draft", false, &[]).await;

		let response = app.get(&format!("/users/{id}")).await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["user"]["name"], "John");
		// Only published posts count toward the public profile.
		assert_eq!(body["user"]["_count"]["posts"], 1);
	}

	#[sqlx::test]
	async fn test_unknown_profile(pool: Database) {
		let app = app(pool);

		let response = app.get(&format!("/users/{}", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}
}
