use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Query},
	openapi::tag,
	route::post,
	Database,
};

use super::{model, Error};

/// Search
/// Searches published posts, users and tags by a case-insensitive
/// substring match, returning at most 20 posts, 10 users and 10 tags.
#[route(tag = tag::SEARCH)]
pub async fn search(
	State(database): State<Database>,
	Query(query): Query<model::SearchQuery>,
) -> Result<Json<model::SearchBody>, Error> {
	let term = query.q.as_deref().map(str::trim).unwrap_or_default();

	if term.is_empty() {
		return Ok(Json(model::SearchBody::default()));
	}

	let pattern = format!("%{term}%");

	let rows = sqlx::query_as::<_, post::model::PostRow>(
		r#"
			SELECT p.id, p.title, p.slug, p.content, p.excerpt, p.cover_image,
				p.published, p.published_at, p.author_id, p.created_at, p.updated_at,
				u.name AS author_name, u.image AS author_image, u.bio AS author_bio,
				(SELECT COUNT(*) FROM post_like l WHERE l.post_id = p.id) AS like_count,
				(SELECT COUNT(*) FROM clap cl WHERE cl.post_id = p.id) AS clap_count,
				(SELECT COUNT(*) FROM comment c WHERE c.post_id = p.id) AS comment_count
			FROM post p
			JOIN "user" u ON u.id = p.author_id
			WHERE p.published
				AND (p.title ILIKE $1 OR p.content ILIKE $1 OR p.excerpt ILIKE $1)
			ORDER BY p.published_at DESC NULLS LAST
			LIMIT 20
		"#,
	)
	.bind(&pattern)
	.fetch_all(&database)
	.await?;

	let posts = post::route::attach_tags(&database, rows).await?;

	let users = sqlx::query_as::<_, model::SearchUser>(
		r#"
			SELECT id, name, image, bio
			FROM "user"
			WHERE name ILIKE $1 OR email ILIKE $1
			ORDER BY name
			LIMIT 10
		"#,
	)
	.bind(&pattern)
	.fetch_all(&database)
	.await?;

	let tags = sqlx::query_as::<_, model::Tag>(
		"SELECT id, name, slug FROM tag WHERE name ILIKE $1 OR slug ILIKE $1 ORDER BY name LIMIT 10",
	)
	.bind(&pattern)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::SearchBody { posts, users, tags }))
}
