use aide::{
	axum::{routing::get_with, ApiRouter, IntoApiResponse},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension, Json};

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.api_route(
			"/docs",
			get_with(Scalar::new("/openapi.json").axum_handler(), |op| {
				op.description("This documentation page.")
			}),
		)
		.api_route(
			"/openapi.json",
			get_with(openapi_json, |op| op.description("OpenAPI description of this API.")),
		)
}

async fn openapi_json(Extension(openapi): Extension<OpenApi>) -> impl IntoApiResponse {
	Json(openapi).into_response()
}
