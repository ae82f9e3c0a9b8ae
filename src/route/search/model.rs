use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::route::post::model::{Post, Tag};

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SearchQuery {
	/// The search term. A missing or blank term returns empty results.
	#[validate(length(max = 100))]
	pub q: Option<String>,
}

/// A user matched by a search, in their public shape.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct SearchUser {
	pub id: Uuid,
	pub name: Option<String>,
	pub image: Option<String>,
	pub bio: Option<String>,
}

#[derive(Default, Serialize, JsonSchema)]
pub struct SearchBody {
	pub posts: Vec<Post>,
	pub users: Vec<SearchUser>,
	pub tags: Vec<Tag>,
}
