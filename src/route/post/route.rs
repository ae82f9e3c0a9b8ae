use std::collections::HashMap;

use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	slug, AppState, Database,
};

use super::{model, model::SlugInput, tags, Error};

/// Batch-fetches the tags for a set of post rows and assembles the full
/// post shapes.
pub(crate) async fn attach_tags(
	database: &Database,
	rows: Vec<model::PostRow>,
) -> Result<Vec<model::Post>, sqlx::Error> {
	let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();

	let tag_rows = sqlx::query_as::<_, model::PostTagRow>(
		r#"
			SELECT pt.post_id, t.id, t.name, t.slug
			FROM post_tag pt
			JOIN tag t ON t.id = pt.tag_id
			WHERE pt.post_id = ANY($1)
			ORDER BY t.name
		"#,
	)
	.bind(&ids)
	.fetch_all(database)
	.await?;

	let mut tags_by_post: HashMap<Uuid, Vec<model::Tag>> = HashMap::new();

	for row in tag_rows {
		tags_by_post.entry(row.post_id).or_default().push(model::Tag {
			id: row.id,
			name: row.name,
			slug: row.slug,
		});
	}

	Ok(rows
		.into_iter()
		.map(|row| {
			let tags = tags_by_post.remove(&row.id).unwrap_or_default();

			row.into_post(tags)
		})
		.collect())
}

/// Fetches a single post by slug with its author, tags and counts.
pub(crate) async fn fetch_post(
	database: &Database,
	slug: &str,
) -> Result<Option<model::Post>, sqlx::Error> {
	let row = sqlx::query_as::<_, model::PostRow>(
		r#"
			SELECT p.id, p.title, p.slug, p.content, p.excerpt, p.cover_image,
				p.published, p.published_at, p.author_id, p.created_at, p.updated_at,
				u.name AS author_name, u.image AS author_image, u.bio AS author_bio,
				(SELECT COUNT(*) FROM post_like l WHERE l.post_id = p.id) AS like_count,
				(SELECT COUNT(*) FROM clap cl WHERE cl.post_id = p.id) AS clap_count,
				(SELECT COUNT(*) FROM comment c WHERE c.post_id = p.id) AS comment_count
			FROM post p
			JOIN "user" u ON u.id = p.author_id
			WHERE p.slug = $1
		"#,
	)
	.bind(slug)
	.fetch_optional(database)
	.await?;

	let Some(row) = row else {
		return Ok(None);
	};

	Ok(attach_tags(database, vec![row]).await?.pop())
}

/// Looks up a post's id by slug, for the engagement and comment routes.
pub(crate) async fn post_id_by_slug(
	database: &Database,
	slug: &str,
) -> Result<Uuid, Error> {
	sqlx::query_scalar::<_, Uuid>("SELECT id FROM post WHERE slug = $1")
		.bind(slug)
		.fetch_optional(database)
		.await?
		.ok_or_else(|| Error::UnknownPost(slug.to_owned()))
}

/// List posts
/// Returns posts ordered by publish time, newest first. Defaults to
/// published posts only, optionally filtered by author or tag slug.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(query): Query<model::ListPostsQuery>,
) -> Result<Json<model::PostsBody>, Error> {
	let rows = sqlx::query_as::<_, model::PostRow>(
		r#"
			SELECT p.id, p.title, p.slug, p.content, p.excerpt, p.cover_image,
				p.published, p.published_at, p.author_id, p.created_at, p.updated_at,
				u.name AS author_name, u.image AS author_image, u.bio AS author_bio,
				(SELECT COUNT(*) FROM post_like l WHERE l.post_id = p.id) AS like_count,
				(SELECT COUNT(*) FROM clap cl WHERE cl.post_id = p.id) AS clap_count,
				(SELECT COUNT(*) FROM comment c WHERE c.post_id = p.id) AS comment_count
			FROM post p
			JOIN "user" u ON u.id = p.author_id
			WHERE p.published = $1
				AND ($2::uuid IS NULL OR p.author_id = $2)
				AND ($3::text IS NULL OR EXISTS (
					SELECT 1 FROM post_tag pt
					JOIN tag t ON t.id = pt.tag_id
					WHERE pt.post_id = p.id AND t.slug = $3
				))
			ORDER BY p.published_at DESC NULLS LAST, p.created_at DESC
		"#,
	)
	.bind(query.published.unwrap_or(true))
	.bind(query.author_id)
	.bind(&query.tag)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::PostsBody {
		posts: attach_tags(&database, rows).await?,
	}))
}

/// Get single post
/// Returns a single post by its unique slug.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<SlugInput>,
) -> Result<Json<model::PostBody>, Error> {
	let post = fetch_post(&database, &path.slug)
		.await?
		.ok_or(Error::UnknownPost(path.slug))?;

	Ok(Json(model::PostBody { post }))
}

/// Create post
/// Creates a new post. The slug is derived from the title with a timestamp
/// suffix; tags are created on first use by their normalized slug.
#[route(tag = tag::POST, response(status = 201, description = "Post created.", shape = "Json<model::PostBody>"))]
pub async fn create_post(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<impl IntoApiResponse, Error> {
	let slug = slug::for_title(&input.title);
	let published = input.published.unwrap_or(false);
	let published_at = published.then(chrono::Utc::now);

	let mut tx = state.database.begin().await?;

	let post_id: Uuid = sqlx::query_scalar(
		r#"
			INSERT INTO post (title, slug, content, excerpt, cover_image, published, published_at, author_id)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			RETURNING id
		"#,
	)
	.bind(&input.title)
	.bind(&slug)
	.bind(&input.content)
	.bind(&input.excerpt)
	.bind(&input.cover_image)
	.bind(published)
	.bind(published_at)
	.bind(session.user.id)
	.fetch_one(&mut *tx)
	.await?;

	tags::attach(&mut tx, post_id, input.tags.as_deref().unwrap_or_default()).await?;

	tx.commit().await?;

	let post = fetch_post(&state.database, &slug)
		.await?
		.ok_or(Error::UnknownPost(slug))?;

	Ok((StatusCode::CREATED, Json(model::PostBody { post })))
}

/// Update post
/// Updates an existing post by its slug. Only the author may update a
/// post; providing `tags` fully replaces the post's tag list.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<SlugInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::PostBody>, Error> {
	let author_id: Option<Uuid> = sqlx::query_scalar("SELECT author_id FROM post WHERE slug = $1")
		.bind(&path.slug)
		.fetch_optional(&state.database)
		.await?;

	let author_id = author_id.ok_or_else(|| Error::UnknownPost(path.slug.clone()))?;

	if author_id != session.user.id {
		return Err(Error::NotPostAuthor);
	}

	let mut tx = state.database.begin().await?;

	// published_at moves only on an actual publish transition: set on
	// false -> true, cleared on true -> false, untouched otherwise.
	let post_id: Uuid = sqlx::query_scalar(
		r#"
			UPDATE post
			SET title = COALESCE($2, title),
				content = COALESCE($3, content),
				excerpt = COALESCE($4, excerpt),
				cover_image = COALESCE($5, cover_image),
				published = COALESCE($6, published),
				published_at = CASE
					WHEN $6::boolean IS NULL THEN published_at
					WHEN $6 AND NOT published THEN now()
					WHEN $6 THEN published_at
					ELSE NULL
				END,
				updated_at = now()
			WHERE slug = $1
			RETURNING id
		"#,
	)
	.bind(&path.slug)
	.bind(&input.title)
	.bind(&input.content)
	.bind(&input.excerpt)
	.bind(&input.cover_image)
	.bind(input.published)
	.fetch_one(&mut *tx)
	.await?;

	if let Some(tags) = &input.tags {
		sqlx::query("DELETE FROM post_tag WHERE post_id = $1")
			.bind(post_id)
			.execute(&mut *tx)
			.await?;

		tags::attach(&mut tx, post_id, tags).await?;
	}

	tx.commit().await?;

	let post = fetch_post(&state.database, &path.slug)
		.await?
		.ok_or(Error::UnknownPost(path.slug))?;

	Ok(Json(model::PostBody { post }))
}

/// Delete post
/// Deletes an existing post by its slug. Only the author may delete a
/// post; its likes, claps, comments and tag associations cascade.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<SlugInput>,
) -> Result<(), Error> {
	let author_id: Option<Uuid> = sqlx::query_scalar("SELECT author_id FROM post WHERE slug = $1")
		.bind(&path.slug)
		.fetch_optional(&database)
		.await?;

	let author_id = author_id.ok_or_else(|| Error::UnknownPost(path.slug.clone()))?;

	if author_id != session.user.id {
		return Err(Error::NotPostAuthor);
	}

	sqlx::query("DELETE FROM post WHERE slug = $1")
		.bind(&path.slug)
		.execute(&database)
		.await?;

	Ok(())
}
