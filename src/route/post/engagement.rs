use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	Database,
};

use super::{model, model::SlugInput, route::post_id_by_slug, Error};

/// Toggle like
/// Likes the post if the caller has not liked it yet, otherwise removes
/// the like. Returns the resulting state.
#[route(tag = tag::POST, response(status = 200, description = "The resulting like state.", shape = "Json<model::LikedBody>"))]
pub async fn toggle_like(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<SlugInput>,
) -> Result<Json<model::LikedBody>, Error> {
	let post_id = post_id_by_slug(&database, &path.slug).await?;

	// Delete first: if a row was removed the caller had liked the post, so
	// the toggle lands on "not liked" without a separate existence check.
	let deleted = sqlx::query("DELETE FROM post_like WHERE user_id = $1 AND post_id = $2")
		.bind(session.user.id)
		.bind(post_id)
		.execute(&database)
		.await?;

	if deleted.rows_affected() > 0 {
		return Ok(Json(model::LikedBody { liked: false }));
	}

	sqlx::query("INSERT INTO post_like (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
		.bind(session.user.id)
		.bind(post_id)
		.execute(&database)
		.await?;

	Ok(Json(model::LikedBody { liked: true }))
}

/// Add claps
/// Adds claps to the post on behalf of the caller, capping the per-user
/// tally at 50. Returns 201 for the caller's first claps on a post and
/// 200 for subsequent additions.
#[route(tag = tag::POST, response(status = 201, description = "First claps recorded.", shape = "Json<model::ClapBody>"))]
pub async fn add_clap(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<SlugInput>,
	Json(input): Json<model::ClapInput>,
) -> Result<impl IntoApiResponse, Error> {
	let post_id = post_id_by_slug(&database, &path.slug).await?;
	let count = input.count.unwrap_or(1);

	let clap = sqlx::query_as::<_, model::Clap>(
		r#"
			UPDATE clap
			SET count = LEAST(count + $3, 50), updated_at = now()
			WHERE user_id = $1 AND post_id = $2
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(post_id)
	.bind(count)
	.fetch_optional(&database)
	.await?;

	if let Some(clap) = clap {
		return Ok((StatusCode::OK, Json(model::ClapBody { clap })).into_response());
	}

	// No existing tally. The upsert covers a concurrent first clap racing
	// this insert, capping the combined total the same way.
	let clap = sqlx::query_as::<_, model::Clap>(
		r#"
			INSERT INTO clap (user_id, post_id, count)
			VALUES ($1, $2, $3)
			ON CONFLICT (user_id, post_id)
			DO UPDATE SET count = LEAST(clap.count + EXCLUDED.count, 50), updated_at = now()
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(post_id)
	.bind(count)
	.fetch_one(&database)
	.await?;

	Ok((StatusCode::CREATED, Json(model::ClapBody { clap })).into_response())
}
