use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::route::model::SlugInput;

/// The public fields of a post or comment author.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Author {
	pub id: Uuid,
	pub name: Option<String>,
	pub image: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bio: Option<String>,
}

/// A tag attached to a post.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Tag {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
}

/// Engagement counters attached to a post.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Counts {
	pub likes: i64,
	pub claps: i64,
	pub comments: i64,
}

/// A single post with its author, tags and engagement counts.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	pub content: String,
	pub excerpt: Option<String>,
	pub cover_image: Option<String>,
	pub published: bool,
	/// Set exactly when the post transitions to published, cleared when it
	/// is unpublished.
	pub published_at: Option<DateTime<Utc>>,
	pub author: Author,
	pub tags: Vec<Tag>,
	#[serde(rename = "_count")]
	pub counts: Counts,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// The flat row shape produced by the post queries, turned into a [`Post`]
/// once its tags are attached.
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	pub content: String,
	pub excerpt: Option<String>,
	pub cover_image: Option<String>,
	pub published: bool,
	pub published_at: Option<DateTime<Utc>>,
	pub author_id: Uuid,
	pub author_name: Option<String>,
	pub author_image: Option<String>,
	pub author_bio: Option<String>,
	pub like_count: i64,
	pub clap_count: i64,
	pub comment_count: i64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl PostRow {
	pub fn into_post(self, tags: Vec<Tag>) -> Post {
		Post {
			id: self.id,
			title: self.title,
			slug: self.slug,
			content: self.content,
			excerpt: self.excerpt,
			cover_image: self.cover_image,
			published: self.published,
			published_at: self.published_at,
			author: Author {
				id: self.author_id,
				name: self.author_name,
				image: self.author_image,
				bio: self.author_bio,
			},
			tags,
			counts: Counts {
				likes: self.like_count,
				claps: self.clap_count,
				comments: self.comment_count,
			},
			created_at: self.created_at,
			updated_at: self.updated_at,
		}
	}
}

/// A tag row qualified by the post it belongs to, for batch fetches.
#[derive(sqlx::FromRow)]
pub struct PostTagRow {
	pub post_id: Uuid,
	pub id: Uuid,
	pub name: String,
	pub slug: String,
}

/// A per-user clap tally on a post, capped at 50.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Clap {
	pub user_id: Uuid,
	pub post_id: Uuid,
	pub count: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A single comment with its author and, for top-level comments, its
/// direct replies.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: Uuid,
	pub content: String,
	pub post_id: Uuid,
	pub parent_id: Option<Uuid>,
	pub author: Author,
	pub replies: Vec<Comment>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CommentRow {
	pub id: Uuid,
	pub content: String,
	pub post_id: Uuid,
	pub parent_id: Option<Uuid>,
	pub author_id: Uuid,
	pub author_name: Option<String>,
	pub author_image: Option<String>,
	pub created_at: DateTime<Utc>,
}

/// The row returned by a comment insert, before the author fields (already
/// known from the session) are attached.
#[derive(Debug, sqlx::FromRow)]
pub struct CommentInsertRow {
	pub id: Uuid,
	pub content: String,
	pub post_id: Uuid,
	pub parent_id: Option<Uuid>,
	pub created_at: DateTime<Utc>,
}

impl CommentRow {
	pub fn into_comment(self, replies: Vec<Comment>) -> Comment {
		Comment {
			id: self.id,
			content: self.content,
			post_id: self.post_id,
			parent_id: self.parent_id,
			author: Author {
				id: self.author_id,
				name: self.author_name,
				image: self.author_image,
				bio: None,
			},
			replies,
			created_at: self.created_at,
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
	#[validate(length(min = 1, max = 200))]
	pub title: String,
	#[validate(length(min = 1))]
	pub content: String,
	#[validate(length(max = 500))]
	pub excerpt: Option<String>,
	#[validate(url)]
	pub cover_image: Option<String>,
	pub tags: Option<Vec<String>>,
	pub published: Option<bool>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
	#[validate(length(min = 1, max = 200))]
	pub title: Option<String>,
	#[validate(length(min = 1))]
	pub content: Option<String>,
	#[validate(length(max = 500))]
	pub excerpt: Option<String>,
	#[validate(url)]
	pub cover_image: Option<String>,
	/// When provided (even empty), fully replaces the post's tag list.
	pub tags: Option<Vec<String>>,
	pub published: Option<bool>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
	/// Defaults to listing published posts only.
	pub published: Option<bool>,
	pub author_id: Option<Uuid>,
	/// Filters to posts carrying this tag slug.
	pub tag: Option<String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ClapInput {
	/// The number of claps to add, defaulting to one.
	#[validate(range(min = 1, max = 50))]
	pub count: Option<i32>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
	#[validate(length(min = 1, max = 4000))]
	pub content: String,
	pub parent_id: Option<Uuid>,
}

#[derive(Serialize, JsonSchema)]
pub struct PostsBody {
	pub posts: Vec<Post>,
}

#[derive(Serialize, JsonSchema)]
pub struct PostBody {
	pub post: Post,
}

#[derive(Serialize, JsonSchema)]
pub struct LikedBody {
	pub liked: bool,
}

#[derive(Serialize, JsonSchema)]
pub struct ClapBody {
	pub clap: Clap,
}

#[derive(Serialize, JsonSchema)]
pub struct CommentsBody {
	pub comments: Vec<Comment>,
}

#[derive(Serialize, JsonSchema)]
pub struct CommentBody {
	pub comment: Comment,
}
