use std::collections::HashMap;

use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	Database,
};

use super::{model, model::SlugInput, route::post_id_by_slug, Error};

/// List comments
/// Returns the post's comments as a one-level tree: top-level comments
/// newest first, each with its direct replies oldest first.
#[route(tag = tag::COMMENT)]
pub async fn list_comments(
	State(database): State<Database>,
	Path(path): Path<SlugInput>,
) -> Result<Json<model::CommentsBody>, Error> {
	let post_id = post_id_by_slug(&database, &path.slug).await?;

	let rows = sqlx::query_as::<_, model::CommentRow>(
		r#"
			SELECT c.id, c.content, c.post_id, c.parent_id, c.created_at,
				u.id AS author_id, u.name AS author_name, u.image AS author_image
			FROM comment c
			JOIN "user" u ON u.id = c.author_id
			WHERE c.post_id = $1
			ORDER BY c.created_at
		"#,
	)
	.bind(post_id)
	.fetch_all(&database)
	.await?;

	let mut top = Vec::new();
	let mut replies: HashMap<Uuid, Vec<model::Comment>> = HashMap::new();

	for row in rows {
		match row.parent_id {
			None => top.push(row),
			Some(parent_id) => {
				replies
					.entry(parent_id)
					.or_default()
					.push(row.into_comment(Vec::new()));
			}
		}
	}

	// Replies whose parent is itself a reply (or was never persisted) stay
	// in the map and are dropped from the display.
	let comments = top
		.into_iter()
		.rev()
		.map(|row| {
			let children = replies.remove(&row.id).unwrap_or_default();

			row.into_comment(children)
		})
		.collect();

	Ok(Json(model::CommentsBody { comments }))
}

/// Create comment
/// Adds a comment to the post, optionally as a reply to another comment.
#[route(tag = tag::COMMENT, response(status = 201, description = "Comment created.", shape = "Json<model::CommentBody>"))]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<SlugInput>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<impl IntoApiResponse, Error> {
	let post_id = post_id_by_slug(&database, &path.slug).await?;

	let row = sqlx::query_as::<_, model::CommentInsertRow>(
		r#"
			INSERT INTO comment (content, post_id, parent_id, author_id)
			VALUES ($1, $2, $3, $4)
			RETURNING id, content, post_id, parent_id, created_at
		"#,
	)
	.bind(&input.content)
	.bind(post_id)
	.bind(input.parent_id)
	.bind(session.user.id)
	.fetch_one(&database)
	.await?;

	let comment = model::Comment {
		id: row.id,
		content: row.content,
		post_id: row.post_id,
		parent_id: row.parent_id,
		author: model::Author {
			id: session.user.id,
			name: session.user.name,
			image: session.user.image,
			bio: None,
		},
		replies: Vec::new(),
		created_at: row.created_at,
	};

	Ok((StatusCode::CREATED, Json(model::CommentBody { comment })))
}
