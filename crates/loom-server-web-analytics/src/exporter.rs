// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The process-wide telemetry context: meter provider, recorder, and the
//! periodic reader that pushes cumulative metrics to the collector.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use opentelemetry::metrics::MeterProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;
use tracing::{debug, info, warn};

use crate::config::TelemetryConfig;
use crate::error::{Result, TelemetryError};
use crate::otlp::DEFAULT_OTLP_ENDPOINT;
use crate::recorder::MetricsRecorder;

/// Service name resource attribute and instrumentation scope name.
pub const SERVICE_NAME: &str = "loom-web-analytics";
pub const DEFAULT_HOST_NAME: &str = "local";
pub const DEFAULT_EXPORT_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

const SERVICE_NAME_KEY: &str = "service.name";
const HOST_NAME_KEY: &str = "host.name";

static INSTALLED: OnceLock<Arc<TelemetryContext>> = OnceLock::new();

/// Attributes describing the emitting process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAttributes {
	pub service_name: String,
	pub host_name: String,
}

impl ResourceAttributes {
	pub fn new(host_name: impl Into<String>) -> Self {
		Self {
			service_name: SERVICE_NAME.to_string(),
			host_name: host_name.into(),
		}
	}

	pub fn to_resource(&self) -> Resource {
		Resource::new([
			KeyValue::new(SERVICE_NAME_KEY, self.service_name.clone()),
			KeyValue::new(HOST_NAME_KEY, self.host_name.clone()),
		])
	}
}

impl Default for ResourceAttributes {
	fn default() -> Self {
		Self::new(DEFAULT_HOST_NAME)
	}
}

/// Where and how often metrics are pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
	pub endpoint: String,
	pub interval: Duration,
	pub timeout: Duration,
	pub resource: ResourceAttributes,
}

impl Default for ExporterConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
			interval: DEFAULT_EXPORT_INTERVAL,
			timeout: DEFAULT_EXPORT_TIMEOUT,
			resource: ResourceAttributes::default(),
		}
	}
}

impl From<&TelemetryConfig> for ExporterConfig {
	fn from(config: &TelemetryConfig) -> Self {
		Self {
			endpoint: config.otlp_endpoint.clone(),
			interval: config.export_interval,
			timeout: config.export_timeout,
			resource: ResourceAttributes::new(config.host_name.clone()),
		}
	}
}

/// Telemetry state shared by every handler.
///
/// Owns the meter provider and the recorder built on it. With a reader the
/// provider exports on the reader's interval; without one, measurements are
/// aggregated and never leave the process.
pub struct TelemetryContext {
	provider: SdkMeterProvider,
	recorder: Arc<MetricsRecorder>,
	exporting: bool,
	shut_down: AtomicBool,
}

impl TelemetryContext {
	/// A context with no exporter.
	pub fn new() -> Self {
		Self::build(None, &ResourceAttributes::default())
	}

	/// A context whose provider is driven by `reader`.
	pub fn with_reader(reader: PeriodicReader, resource: &ResourceAttributes) -> Self {
		Self::build(Some(reader), resource)
	}

	fn build(reader: Option<PeriodicReader>, resource: &ResourceAttributes) -> Self {
		let exporting = reader.is_some();
		let mut builder = SdkMeterProvider::builder().with_resource(resource.to_resource());
		if let Some(reader) = reader {
			builder = builder.with_reader(reader);
		}
		let provider = builder.build();
		let recorder = Arc::new(MetricsRecorder::new(&provider.meter(SERVICE_NAME)));

		Self {
			provider,
			recorder,
			exporting,
			shut_down: AtomicBool::new(false),
		}
	}

	/// Installs the process-wide context. Only the first call runs `init`;
	/// later calls return the installed context and `false`.
	pub fn install(init: impl FnOnce() -> Self) -> (Arc<Self>, bool) {
		let mut installed = false;
		let context = INSTALLED.get_or_init(|| {
			installed = true;
			Arc::new(init())
		});
		if !installed {
			debug!("Telemetry context already installed");
		}
		(Arc::clone(context), installed)
	}

	pub fn recorder(&self) -> &Arc<MetricsRecorder> {
		&self.recorder
	}

	pub fn is_exporting(&self) -> bool {
		self.exporting && !self.shut_down.load(Ordering::SeqCst)
	}

	/// Collects and exports now, outside the reader's interval.
	pub async fn flush(&self) -> Result<()> {
		let provider = self.provider.clone();
		tokio::task::spawn_blocking(move || provider.force_flush())
			.await?
			.map_err(|e| TelemetryError::Flush(e.to_string()))
	}

	/// Performs a final export and stops the reader. Safe to call more than once.
	pub async fn shutdown(&self) {
		if self.shut_down.swap(true, Ordering::SeqCst) {
			debug!("Telemetry already shut down");
			return;
		}

		let provider = self.provider.clone();
		match tokio::task::spawn_blocking(move || provider.shutdown()).await {
			Ok(Ok(())) => info!("Telemetry shut down"),
			Ok(Err(e)) => warn!(error = %e, "Final metrics export failed"),
			Err(e) => warn!(error = %e, "Telemetry shutdown task failed"),
		}
	}
}

impl Default for TelemetryContext {
	fn default() -> Self {
		Self::new()
	}
}
