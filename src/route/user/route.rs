use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	Database,
};

use super::{model, model::IdInput, Error};

/// Get profile
/// Returns a user's public profile with follower, following and published
/// post counts.
#[route(tag = tag::USER)]
pub async fn get_user(
	State(database): State<Database>,
	Path(path): Path<IdInput>,
) -> Result<Json<model::ProfileBody>, Error> {
	let row = sqlx::query_as::<_, model::ProfileRow>(
		r#"
			SELECT u.id, u.name, u.image, u.bio, u.created_at,
				(SELECT COUNT(*) FROM follow f WHERE f.following_id = u.id) AS follower_count,
				(SELECT COUNT(*) FROM follow f WHERE f.follower_id = u.id) AS following_count,
				(SELECT COUNT(*) FROM post p WHERE p.author_id = u.id AND p.published) AS post_count
			FROM "user" u
			WHERE u.id = $1
		"#,
	)
	.bind(path.id)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownUser(path.id))?;

	Ok(Json(model::ProfileBody { user: row.into() }))
}

/// Get follow status
/// Reports whether the caller follows the given user. Anonymous callers,
/// unknown users and lookup failures all read as not following.
#[route(tag = tag::USER)]
pub async fn get_follow_status(
	State(database): State<Database>,
	session: Option<Session>,
	Path(path): Path<IdInput>,
) -> Json<model::FollowingBody> {
	let Some(session) = session else {
		return Json(model::FollowingBody { following: false });
	};

	let following = sqlx::query_scalar::<_, bool>(
		"SELECT EXISTS(SELECT 1 FROM follow WHERE follower_id = $1 AND following_id = $2)",
	)
	.bind(session.user.id)
	.bind(path.id)
	.fetch_one(&database)
	.await
	.unwrap_or(false);

	Json(model::FollowingBody { following })
}

/// Toggle follow
/// Follows the given user if the caller does not follow them yet,
/// otherwise unfollows. Returns the resulting state.
#[route(tag = tag::USER)]
pub async fn toggle_follow(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<model::FollowingBody>, Error> {
	if path.id == session.user.id {
		return Err(Error::SelfFollow);
	}

	let exists = sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM "user" WHERE id = $1)"#)
		.bind(path.id)
		.fetch_one(&database)
		.await?;

	if !exists {
		return Err(Error::UnknownUser(path.id));
	}

	let deleted = sqlx::query("DELETE FROM follow WHERE follower_id = $1 AND following_id = $2")
		.bind(session.user.id)
		.bind(path.id)
		.execute(&database)
		.await?;

	if deleted.rows_affected() > 0 {
		return Ok(Json(model::FollowingBody { following: false }));
	}

	sqlx::query(
		"INSERT INTO follow (follower_id, following_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
	)
	.bind(session.user.id)
	.bind(path.id)
	.execute(&database)
	.await?;

	Ok(Json(model::FollowingBody { following: true }))
}
