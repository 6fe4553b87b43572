#![allow(clippy::module_name_repetitions)]

use axum::response::{IntoResponse, Response};
use axum_jsonschema::Json;
use http::StatusCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CDN_CACHE_CONTROL: &str = "cdn-cache-control";
/// Results rarely change, so shared caches may keep them for a day.
const CDN_CACHE_POLICY: &str = "s-maxage=86400, stale-while-revalidate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
	/// Checksummed address. Always set when an address was requested.
	pub address: Option<String>,
	/// ENS name. Always set when a name was requested.
	pub name: Option<String>,
	/// The name if known, otherwise a shortened address.
	pub display_name: String,
	/// Metadata service URL for the name's avatar.
	pub avatar: Option<String>,
	/// Present when the lookup failed. The other fields hold whatever was known before the failure.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl IntoResponse for ResolutionResult {
	fn into_response(self) -> Response {
		if self.error.is_some() {
			return (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response();
		}

		([(CDN_CACHE_CONTROL, CDN_CACHE_POLICY)], Json(self)).into_response()
	}
}
