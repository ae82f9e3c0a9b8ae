use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::slug;

/// Associates a list of tag names with a post, creating any tags that do
/// not exist yet.
///
/// Tags are identified by their normalized slug, so `"Tech"`, `"tech"` and
/// `" TECH "` all resolve to the same tag. Names that normalize to an empty
/// slug are skipped, and duplicates within one call collapse to a single
/// association.
pub async fn attach(
	tx: &mut Transaction<'_, Postgres>,
	post_id: Uuid,
	names: &[String],
) -> Result<(), sqlx::Error> {
	for name in names {
		let slug = slug::normalize(name);

		if slug.is_empty() {
			continue;
		}

		// Create-then-select rather than select-then-create, so a tag
		// created concurrently under the same slug is picked up instead of
		// failing the unique constraint.
		let tag_id: Option<Uuid> = sqlx::query_scalar(
			"INSERT INTO tag (name, slug) VALUES ($1, $2) ON CONFLICT (slug) DO NOTHING RETURNING id",
		)
		.bind(name.trim())
		.bind(&slug)
		.fetch_optional(&mut **tx)
		.await?;

		let tag_id = match tag_id {
			Some(id) => id,
			None => {
				sqlx::query_scalar("SELECT id FROM tag WHERE slug = $1")
					.bind(&slug)
					.fetch_one(&mut **tx)
					.await?
			}
		};

		sqlx::query(
			"INSERT INTO post_tag (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
		)
		.bind(post_id)
		.bind(tag_id)
		.execute(&mut **tx)
		.await?;
	}

	Ok(())
}
