// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

use std::time::Duration;

use serde::Deserialize;

use crate::exporter::DEFAULT_HOST_NAME;
use crate::otlp::DEFAULT_OTLP_ENDPOINT;

/// HTTP listener configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
}

impl Default for HttpConfig {
	fn default() -> Self {
		HttpConfigLayer::default().finalize()
	}
}

/// HTTP configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HttpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: HttpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
	}

	pub fn finalize(self) -> HttpConfig {
		HttpConfig {
			host: self.host.unwrap_or_else(|| "0.0.0.0".to_string()),
			port: self.port.unwrap_or(3000),
		}
	}
}

/// Metrics export configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
	pub enabled: bool,
	pub otlp_endpoint: String,
	pub host_name: String,
	pub export_interval: Duration,
	pub export_timeout: Duration,
}

impl Default for TelemetryConfig {
	fn default() -> Self {
		TelemetryConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TelemetryConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub otlp_endpoint: Option<String>,
	#[serde(default)]
	pub host_name: Option<String>,
	#[serde(default)]
	pub export_interval_secs: Option<u64>,
	#[serde(default)]
	pub export_timeout_secs: Option<u64>,
}

impl TelemetryConfigLayer {
	pub fn merge(&mut self, other: TelemetryConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.otlp_endpoint.is_some() {
			self.otlp_endpoint = other.otlp_endpoint;
		}
		if other.host_name.is_some() {
			self.host_name = other.host_name;
		}
		if other.export_interval_secs.is_some() {
			self.export_interval_secs = other.export_interval_secs;
		}
		if other.export_timeout_secs.is_some() {
			self.export_timeout_secs = other.export_timeout_secs;
		}
	}

	pub fn finalize(self) -> TelemetryConfig {
		TelemetryConfig {
			enabled: self.enabled.unwrap_or(true),
			otlp_endpoint: self
				.otlp_endpoint
				.unwrap_or_else(|| DEFAULT_OTLP_ENDPOINT.to_string()),
			host_name: self
				.host_name
				.unwrap_or_else(|| DEFAULT_HOST_NAME.to_string()),
			export_interval: Duration::from_secs(self.export_interval_secs.unwrap_or(15)),
			export_timeout: Duration::from_secs(self.export_timeout_secs.unwrap_or(10)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		LoggingConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| "info".to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		assert_eq!(
			HttpConfig::default(),
			HttpConfig {
				host: "0.0.0.0".to_string(),
				port: 3000
			}
		);

		let telemetry = TelemetryConfig::default();
		assert!(telemetry.enabled);
		assert_eq!(telemetry.otlp_endpoint, "http://localhost:4317");
		assert_eq!(telemetry.host_name, "local");
		assert_eq!(telemetry.export_interval, Duration::from_secs(15));
		assert_eq!(telemetry.export_timeout, Duration::from_secs(10));

		assert_eq!(LoggingConfig::default().level, "info");
	}

	#[test]
	fn test_merge_only_overrides_present_fields() {
		let mut base = TelemetryConfigLayer {
			otlp_endpoint: Some("http://collector:4317".to_string()),
			export_interval_secs: Some(30),
			..Default::default()
		};
		base.merge(TelemetryConfigLayer {
			export_interval_secs: Some(5),
			host_name: Some("web-1".to_string()),
			..Default::default()
		});

		let config = base.finalize();
		assert_eq!(config.otlp_endpoint, "http://collector:4317");
		assert_eq!(config.export_interval, Duration::from_secs(5));
		assert_eq!(config.host_name, "web-1");
	}
}
