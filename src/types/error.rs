#![allow(clippy::module_name_repetitions)]

use aide::OperationOutput;
use axum::response::IntoResponse;
use axum_jsonschema::Json;
use http::StatusCode;
use serde_json::json;

#[derive(Debug)]
pub struct ErrorResponse {
	error: String,
	status: StatusCode,
}

impl ErrorResponse {
	pub const fn not_found(error: String) -> Self {
		Self {
			error,
			status: StatusCode::NOT_FOUND,
		}
	}
}

impl IntoResponse for ErrorResponse {
	fn into_response(self) -> axum::response::Response {
		(self.status, Json(json! ({ "error": self.error }))).into_response()
	}
}

impl OperationOutput for ErrorResponse {
	type Inner = Self;

	fn operation_response(
		_: &mut aide::gen::GenContext,
		_: &mut aide::openapi::Operation,
	) -> Option<aide::openapi::Response> {
		None
	}
}
