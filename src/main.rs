#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Result;
use config::Config;
use dotenvy::dotenv;
use tokio::{signal, sync::broadcast};
use tracing_subscriber::{
	prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

mod config;
mod ens;
mod routes;
mod server;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
	dotenv().ok();

	// Initialize DataDog tracing
	let (_guard, _tracer_shutdown) = datadog_tracing::init()?;

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| "ens_resolve=info,tower_http=debug".into());

	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer())
		.with(env_filter)
		.init();

	let config = Config::from_env()?;

	let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
	tokio::spawn(async move {
		shutdown_signal().await;
		tracing::info!("Shutdown signal received, draining connections...");
		shutdown_tx.send(()).ok();
	});

	server::start(config, shutdown_rx).await
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c().await.ok();
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			},
			Err(e) => {
				tracing::warn!("Failed to listen for SIGTERM: {e}");
				std::future::pending::<()>().await;
			},
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}
}
