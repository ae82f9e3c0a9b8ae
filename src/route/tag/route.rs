use axum::extract::State;
use macros::route;

use crate::{extract::Json, openapi::tag, Database};

use super::{model, Error};

/// List tags
/// Returns every tag, busiest first, with the number of published posts
/// carrying it.
#[route(tag = tag::TAG)]
pub async fn get_tags(State(database): State<Database>) -> Result<Json<model::TagsBody>, Error> {
	let rows = sqlx::query_as::<_, model::TagRow>(
		r#"
			SELECT t.id, t.name, t.slug,
				COUNT(p.id) FILTER (WHERE p.published) AS post_count
			FROM tag t
			LEFT JOIN post_tag pt ON pt.tag_id = t.id
			LEFT JOIN post p ON p.id = pt.post_id
			GROUP BY t.id
			ORDER BY post_count DESC, t.name
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::TagsBody {
		tags: rows.into_iter().map(Into::into).collect(),
	}))
}
