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

	ApiRouter::new().api_route("/", get_with(search, search_docs))
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
	async fn test_search_matches(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "Tech John").await;

		create_post(&app, "All about tech", true, &["tech"]).await;
		create_post(&app, "Secret tech draft", false, &["tech"]).await;
		create_post(&app, "Gardening", true, &[]).await;

		let response = app.get("/search?q=TECH").await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<serde_json::Value>();

		// Case-insensitive, and drafts stay hidden.
		assert_eq!(body["posts"].as_array().unwrap().len(), 1);
		assert_eq!(body["posts"][0]["title"], "All about tech");
		assert_eq!(body["users"].as_array().unwrap().len(), 1);
		assert_eq!(body["tags"].as_array().unwrap().len(), 1);
		assert_eq!(body["tags"][0]["slug"], "tech");
	}

	#[sqlx::test]
	async fn test_search_blank_term(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		create_post(&app, "Anything", true, &[]).await;

		for path in ["/search", "/search?q=", "/search?q=%20%20"] {
			let response = app.get(path).await;

			assert_eq!(response.status_code(), 200);

			let body = response.json::<serde_json::Value>();

			assert_eq!(body["posts"].as_array().unwrap().len(), 0);
			assert_eq!(body["users"].as_array().unwrap().len(), 0);
			assert_eq!(body["tags"].as_array().unwrap().len(), 0);
		}
	}
}
