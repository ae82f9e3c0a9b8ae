use aide::axum::{routing::get_with, ApiRouter};
use axum::{
	body::Body,
	http::{Response, StatusCode},
	response::IntoResponse,
};

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", get_with(get_tags, get_tags_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::INTERNAL_SERVER_ERROR
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		error::Message::new("internal_server_error").into_vec()
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
	async fn test_list_tags_with_counts(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		create_post(&app, "First", true, &["rust", "web"]).await;
		create_post(&app, "Second", true, &["rust"]).await;
		create_post(&app, "Hidden", false, &["rust"]).await;

		let response = app.get("/tags").await;

		assert_eq!(response.status_code(), 200);

		let tags = response.json::<serde_json::Value>()["tags"].clone();

		assert_eq!(tags.as_array().unwrap().len(), 2);
		assert_eq!(tags[0]["slug"], "rust");
		// Draft posts never count toward a tag.
		assert_eq!(tags[0]["_count"]["posts"], 2);
		assert_eq!(tags[1]["slug"], "web");
		assert_eq!(tags[1]["_count"]["posts"], 1);
	}

	#[sqlx::test]
	async fn test_list_tags_empty(pool: Database) {
		let app = app(pool);

		let response = app.get("/tags").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<serde_json::Value>()["tags"]
				.as_array()
				.unwrap()
				.len(),
			0
		);
	}
}
