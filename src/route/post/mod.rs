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

pub mod comment;
pub mod engagement;
pub mod model;
pub mod route;
pub mod tags;

/// An error that can occur while working with posts, comments or
/// engagement.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(String),
	#[error("not the post author")]
	NotPostAuthor,
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:slug",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route(
			"/:slug/like",
			post_with(engagement::toggle_like, engagement::toggle_like_docs),
		)
		.api_route(
			"/:slug/clap",
			post_with(engagement::add_clap, engagement::add_clap_docs),
		)
		.api_route(
			"/:slug/comments",
			get_with(comment::list_comments, comment::list_comments_docs)
				.post_with(comment::create_comment, comment::create_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotPostAuthor => StatusCode::FORBIDDEN,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(slug) => error::Message::new("unknown_post")
				.detail("slug", slug.as_str())
				.into_vec(),
			Self::NotPostAuthor => error::Message::new("not_post_author").into_vec(),
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
	async fn test_publish_lifecycle(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "My draft", false, &[]).await;

		let response = app.get(&format!("/posts/{slug}")).await;

		assert_eq!(response.status_code(), 200);
		assert!(response.json::<serde_json::Value>()["post"]["publishedAt"].is_null());

		let response = app
			.put(&format!("/posts/{slug}"))
			.json(&json!({ "published": true }))
			.await;

		assert_eq!(response.status_code(), 200);

		let published_at = response.json::<serde_json::Value>()["post"]["publishedAt"].clone();

		assert!(published_at.is_string());

		// An unrelated edit must not move the publish time.
		let response = app
			.put(&format!("/posts/{slug}"))
			.json(&json!({ "title": "My post" }))
			.await;

		assert_eq!(
			response.json::<serde_json::Value>()["post"]["publishedAt"],
			published_at
		);

		let response = app
			.put(&format!("/posts/{slug}"))
			.json(&json!({ "published": false }))
			.await;

		assert!(response.json::<serde_json::Value>()["post"]["publishedAt"].is_null());
	}

	#[sqlx::test]
	async fn test_tags_normalize_and_dedupe(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "Tagged", true, &["Tech", "tech", " TECH "]).await;

		let response = app.get(&format!("/posts/{slug}")).await;
		let tags = response.json::<serde_json::Value>()["post"]["tags"].clone();

		assert_eq!(tags.as_array().unwrap().len(), 1);
		assert_eq!(tags[0]["slug"], "tech");
	}

	#[sqlx::test]
	async fn test_update_replaces_tags(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "Tagged", true, &["rust", "web"]).await;

		let response = app
			.put(&format!("/posts/{slug}"))
			.json(&json!({ "tags": ["rust"] }))
			.await;

		let tags = response.json::<serde_json::Value>()["post"]["tags"].clone();

		assert_eq!(tags.as_array().unwrap().len(), 1);

		// An empty list clears every association.
		let response = app
			.put(&format!("/posts/{slug}"))
			.json(&json!({ "tags": [] }))
			.await;

		let tags = response.json::<serde_json::Value>()["post"]["tags"].clone();

		assert_eq!(tags.as_array().unwrap().len(), 0);
	}

	#[sqlx::test]
	async fn test_update_requires_author(pool: Database) {
		let author = app(pool.clone());
		let other = app(pool);

		register(&author, "john@smith.com", "John").await;

		let slug = create_post(&author, "Mine", true, &[]).await;

		register(&other, "jane@smith.com", "Jane").await;

		let response = other
			.put(&format!("/posts/{slug}"))
			.json(&json!({ "title": "Hijacked" }))
			.await;

		assert_eq!(response.status_code(), 403);

		let response = other.delete(&format!("/posts/{slug}")).await;

		assert_eq!(response.status_code(), 403);
	}

	#[sqlx::test]
	async fn test_get_unknown_post(pool: Database) {
		let app = app(pool);

		let response = app.get("/posts/not-a-real-slug").await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_list_filters(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		create_post(&app, "Published tech", true, &["tech"]).await;
		create_post(&app, "Draft", false, &[]).await;

		let response = app.get("/posts").await;
		let posts = response.json::<serde_json::Value>()["posts"].clone();

		assert_eq!(posts.as_array().unwrap().len(), 1);
		assert_eq!(posts[0]["title"], "Published tech");

		let response = app.get("/posts?published=false").await;
		let posts = response.json::<serde_json::Value>()["posts"].clone();

		assert_eq!(posts.as_array().unwrap().len(), 1);
		assert_eq!(posts[0]["title"], "Draft");

		let response = app.get("/posts?tag=tech").await;

		assert_eq!(
			response.json::<serde_json::Value>()["posts"]
				.as_array()
				.unwrap()
				.len(),
			1
		);

		let response = app.get("/posts?tag=cooking").await;

		assert_eq!(
			response.json::<serde_json::Value>()["posts"]
				.as_array()
				.unwrap()
				.len(),
			0
		);
	}

	#[sqlx::test]
	async fn test_like_toggle(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "Likable", true, &[]).await;

		let response = app.post(&format!("/posts/{slug}/like")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["liked"], true);

		let response = app.get(&format!("/posts/{slug}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["post"]["_count"]["likes"],
			1
		);

		let response = app.post(&format!("/posts/{slug}/like")).await;

		assert_eq!(response.json::<serde_json::Value>()["liked"], false);

		let response = app.get(&format!("/posts/{slug}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["post"]["_count"]["likes"],
			0
		);
	}

	#[sqlx::test]
	async fn test_clap_cap(pool: Database) {
		let app = app(pool.clone());

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "Clappable", true, &[]).await;

		let response = app
			.post(&format!("/posts/{slug}/clap"))
			.json(&json!({ "count": 30 }))
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json::<serde_json::Value>()["clap"]["count"], 30);

		let response = app
			.post(&format!("/posts/{slug}/clap"))
			.json(&json!({ "count": 30 }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["clap"]["count"], 50);

		// One row per user and post, tallied and capped in place.
		let count: i32 = sqlx::query_scalar("SELECT count FROM clap")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(count, 50);
	}

	#[sqlx::test]
	async fn test_comment_threading(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "Discussed", true, &[]).await;

		let first = app
			.post(&format!("/posts/{slug}/comments"))
			.json(&json!({ "content": "first" }))
			.await;

		assert_eq!(first.status_code(), 201);

		let first_id = first.json::<serde_json::Value>()["comment"]["id"].clone();

		app.post(&format!("/posts/{slug}/comments"))
			.json(&json!({ "content": "second" }))
			.await;

		let reply = app
			.post(&format!("/posts/{slug}/comments"))
			.json(&json!({ "content": "a reply", "parentId": first_id }))
			.await;

		assert_eq!(reply.status_code(), 201);

		let reply_id = reply.json::<serde_json::Value>()["comment"]["id"].clone();

		// A reply to a reply is stored, but never shows in the one-level
		// tree.
		app.post(&format!("/posts/{slug}/comments"))
			.json(&json!({ "content": "too deep", "parentId": reply_id }))
			.await;

		let response = app.get(&format!("/posts/{slug}/comments")).await;
		let comments = response.json::<serde_json::Value>()["comments"].clone();

		assert_eq!(comments.as_array().unwrap().len(), 2);
		assert_eq!(comments[0]["content"], "second");
		assert_eq!(comments[1]["content"], "first");
		assert_eq!(comments[1]["replies"].as_array().unwrap().len(), 1);
		assert_eq!(comments[1]["replies"][0]["content"], "a reply");

		// The post's comment count still covers every stored row.
		let response = app.get(&format!("/posts/{slug}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["post"]["_count"]["comments"],
			4
		);
	}

	#[sqlx::test]
	async fn test_comment_dangling_parent(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John").await;

		let slug = create_post(&app, "Discussed", true, &[]).await;

		let response = app
			.post(&format!("/posts/{slug}/comments"))
			.json(&json!({ "content": "orphan", "parentId": Uuid::new_v4() }))
			.await;

		assert_eq!(response.status_code(), 201);

		// Stored and counted, just never displayed.
		let response = app.get(&format!("/posts/{slug}/comments")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["comments"]
				.as_array()
				.unwrap()
				.len(),
			0
		);

		let response = app.get(&format!("/posts/{slug}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["post"]["_count"]["comments"],
			1
		);
	}

	#[sqlx::test]
	async fn test_requires_session(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/posts")
			.json(&json!({ "title": "Anonymous", "content": "no" }))
			.await;

		assert_eq!(response.status_code(), 401);

		let response = app.post("/posts/some-slug/like").await;

		assert_eq!(response.status_code(), 401);
	}
}
