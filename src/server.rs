use aide::openapi::{self, OpenApi};
use anyhow::Result;
use axum::{Extension, Router};
use datadog_tracing::axum::{OtelAxumLayer, OtelInResponseLayer};
use http::Method;
use std::{env, net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, sync::broadcast};
use tower_http::{
	cors::{Any, CorsLayer},
	timeout::TimeoutLayer,
};

use crate::{
	config::{Config, ResolverExt},
	routes,
};

pub fn router(config: Config, resolver: ResolverExt) -> Router {
	let mut openapi = OpenApi {
		info: openapi::Info {
			title: "ENS Resolve API".to_string(),
			version: env!("CARGO_PKG_VERSION").to_string(),
			..openapi::Info::default()
		},
		..OpenApi::default()
	};

	routes::handler()
		.finish_api(&mut openapi)
		.fallback(routes::not_found)
		.layer(Extension(openapi))
		.layer(resolver)
		.layer(config.extension())
}

pub async fn start(config: Config, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
	let resolver = config.resolver_extension()?;

	let router = router(config, resolver)
		.layer(OtelInResponseLayer)
		.layer((
			OtelAxumLayer::default(),
			TimeoutLayer::new(Duration::from_secs(90)),
		))
		.layer(
			CorsLayer::new()
				.allow_methods([Method::GET])
				.allow_origin(Any),
		);

	let addr = SocketAddr::from((
		[0, 0, 0, 0],
		env::var("PORT").map_or(Ok(8000), |p| p.parse())?,
	));
	let listener = TcpListener::bind(&addr).await?;

	tracing::info!("Starting server on {addr}...");

	axum::serve(listener, router.into_make_service())
		.with_graceful_shutdown(async move {
			shutdown.recv().await.ok();
		})
		.await?;

	tracing::info!("Server stopped.");

	Ok(())
}
