use http::StatusCode;

pub async fn health() -> StatusCode {
	StatusCode::OK
}

pub fn docs(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
	op.description("Health check.")
}
