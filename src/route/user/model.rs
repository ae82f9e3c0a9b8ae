use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

pub use crate::route::model::IdInput;

/// Aggregate counters shown on a public profile.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Counts {
	pub followers: i64,
	pub following: i64,
	pub posts: i64,
}

/// A user's public profile.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub id: Uuid,
	pub name: Option<String>,
	pub image: Option<String>,
	pub bio: Option<String>,
	#[serde(rename = "_count")]
	pub counts: Counts,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
	pub id: Uuid,
	pub name: Option<String>,
	pub image: Option<String>,
	pub bio: Option<String>,
	pub follower_count: i64,
	pub following_count: i64,
	pub post_count: i64,
	pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
	fn from(row: ProfileRow) -> Self {
		Self {
			id: row.id,
			name: row.name,
			image: row.image,
			bio: row.bio,
			counts: Counts {
				followers: row.follower_count,
				following: row.following_count,
				posts: row.post_count,
			},
			created_at: row.created_at,
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct ProfileBody {
	pub user: Profile,
}

#[derive(Serialize, JsonSchema)]
pub struct FollowingBody {
	pub following: bool,
}
