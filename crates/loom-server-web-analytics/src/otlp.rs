// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OTLP/gRPC metrics export.
//!
//! The exporter keeps the SDK's default cumulative temporality, so counters
//! reach the collector as monotonic cumulative sums and histograms as
//! cumulative explicit-bucket histograms.

use std::time::Duration;

use opentelemetry_otlp::{MetricExporter, WithExportConfig};
use opentelemetry_sdk::metrics::PeriodicReader;
use opentelemetry_sdk::runtime;
use tracing::info;

use crate::error::{Result, TelemetryError};
use crate::exporter::ExporterConfig;

pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";

/// Builds a tonic OTLP metrics exporter. The channel connects lazily, so an
/// unreachable collector only shows up as failed exports.
pub fn metric_exporter(endpoint: &str, timeout: Duration) -> Result<MetricExporter> {
	if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
		return Err(TelemetryError::InvalidEndpoint(endpoint.to_string()));
	}

	MetricExporter::builder()
		.with_tonic()
		.with_endpoint(endpoint)
		.with_timeout(timeout)
		.build()
		.map_err(|e| TelemetryError::Exporter(e.to_string()))
}

/// A reader that pushes to the configured collector every `config.interval`.
pub fn periodic_reader(config: &ExporterConfig) -> Result<PeriodicReader> {
	let exporter = metric_exporter(&config.endpoint, config.timeout)?;

	info!(
		endpoint = %config.endpoint,
		interval_secs = config.interval.as_secs(),
		service_name = %config.resource.service_name,
		host_name = %config.resource.host_name,
		"Starting OTLP metrics export"
	);

	Ok(PeriodicReader::builder(exporter, runtime::Tokio)
		.with_interval(config.interval)
		.with_timeout(config.timeout)
		.build())
}
