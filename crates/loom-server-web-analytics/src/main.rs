// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loom web analytics server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use loom_server_web_analytics::config::{load_config_with_file, DEFAULT_CONFIG_PATH};
use loom_server_web_analytics::{
	create_router, periodic_reader, ExporterConfig, TelemetryContext, WebAnalyticsState,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Receives page-view, session-end and web-vital beacons and exports them as OTLP metrics.
#[derive(Parser, Debug)]
#[command(
	name = "loom-server-web-analytics",
	about = "Loom web analytics telemetry server",
	version
)]
struct Args {
	/// Path to the TOML config file
	#[arg(long, env = "LOOM_WEB_ANALYTICS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
	config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	dotenvy::dotenv().ok();

	let config = load_config_with_file(&args.config)?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		telemetry_enabled = config.telemetry.enabled,
		otlp_endpoint = %config.telemetry.otlp_endpoint,
		"starting loom-server-web-analytics"
	);

	let (telemetry, _) = if config.telemetry.enabled {
		let exporter_config = ExporterConfig::from(&config.telemetry);
		let reader = periodic_reader(&exporter_config)?;
		TelemetryContext::install(|| {
			TelemetryContext::with_reader(reader, &exporter_config.resource)
		})
	} else {
		tracing::warn!("Telemetry export disabled, metrics will only be kept in memory");
		TelemetryContext::install(TelemetryContext::new)
	};

	let app = create_router(WebAnalyticsState::new(Arc::clone(&telemetry)))
		.layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "Failed to listen for shutdown signal");
			}
			tracing::info!("Received shutdown signal");
		})
		.await?;

	tracing::info!("Flushing telemetry...");
	telemetry.shutdown().await;

	tracing::info!("Server shutdown complete");
	Ok(())
}
