use aide::axum::{routing::get_with, ApiRouter};

mod resolve;
#[cfg(test)]
mod tests;

use resolve::{docs as resolve_docs, resolve};

pub fn handler() -> ApiRouter {
	ApiRouter::new().api_route("/resolve/:address", get_with(resolve, resolve_docs))
}
