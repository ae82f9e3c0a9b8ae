use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single structured error message, optionally tied to an input field.
///
/// The `content` is a stable machine-readable code; extra context goes
/// into `details`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'e> {
	pub content: Cow<'e, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'e, Map>>,
}

impl<'e> Message<'e> {
	pub fn new(content: impl Into<Cow<'e, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'e, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'e> {
	pub success: bool,
	pub errors: Vec<Message<'e>>,
}

/// Maps an error onto an HTTP status code and a list of client-facing
/// messages.
///
/// The [`std::fmt::Display`] output is never sent to the client, so it can
/// carry sensitive information for the logs.
pub trait ErrorShape: std::fmt::Display {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn into_response(&self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(%status, error = %self, "request failed");
		}

		(
			status,
			Json(ErrorResponse {
				success: false,
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

/// Errors produced outside the route handlers themselves: extractor
/// rejections, input validation, and rate limiting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json rejection")]
	Json(axum_jsonschema::JsonSchemaRejection),
	#[error("query rejection: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path rejection: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("rate limited: {0}")]
	RateLimit(#[from] tower_governor::GovernorError),
}

impl From<axum_jsonschema::JsonSchemaRejection> for AppError {
	fn from(rejection: axum_jsonschema::JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::RateLimit(tower_governor::GovernorError::TooManyRequests { .. }) => {
				StatusCode::TOO_MANY_REQUESTS
			}
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors
						.iter()
						.map(move |error| Message::new(error.code.clone()).field(field))
				})
				.collect(),
			Self::Json(..) => Message::new("invalid_json").into_vec(),
			Self::Query(..) => Message::new("invalid_query").into_vec(),
			Self::Path(..) => Message::new("invalid_path").into_vec(),
			Self::RateLimit(tower_governor::GovernorError::TooManyRequests { .. }) => {
				Message::new("too_many_requests").into_vec()
			}
			// Opaque on purpose; the cause is logged server-side only.
			Self::RateLimit(..) => Message::new("internal_server_error").into_vec(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		ErrorShape::into_response(&self)
	}
}

impl aide::OperationOutput for AppError {
	type Inner = Self;
}
