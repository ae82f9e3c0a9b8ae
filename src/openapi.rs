use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const USER: &str = "User";
	pub const TAG: &str = "Tag";
	pub const SEARCH: &str = "Search";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Quill Open API")
		.summary("A blogging and publishing platform")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("User authentication".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management and engagement".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Threaded comments".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::USER.into(),
			description: Some("Profiles and follows".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::TAG.into(),
			description: Some("Post tags".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::SEARCH.into(),
			description: Some("Search across posts, users and tags".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse<'static>>, _>(|res| {
			res.example(error::ErrorResponse {
				success: false,
				errors: error::Message::new("error_code")
					.field("optional field")
					.detail("key", "value")
					.into_vec(),
			})
		})
}
