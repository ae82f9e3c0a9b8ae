use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

/// Per-tag counters.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Counts {
	pub posts: i64,
}

/// A tag with the number of published posts carrying it.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Tag {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	#[serde(rename = "_count")]
	pub counts: Counts,
}

#[derive(Debug, sqlx::FromRow)]
pub struct TagRow {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub post_count: i64,
}

impl From<TagRow> for Tag {
	fn from(row: TagRow) -> Self {
		Self {
			id: row.id,
			name: row.name,
			slug: row.slug,
			counts: Counts {
				posts: row.post_count,
			},
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct TagsBody {
	pub tags: Vec<Tag>,
}
