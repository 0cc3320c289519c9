// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the web analytics server.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`LOOM_WEB_ANALYTICS_*`, `OTEL_EXPORTER_OTLP_ENDPOINT`, `HOSTNAME`)
//! 2. Config file (`/etc/loom/web-analytics.toml`)
//! 3. Built-in defaults

pub mod sections;
pub mod sources;

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub use sections::{
	HttpConfig, HttpConfigLayer, LoggingConfig, LoggingConfigLayer, TelemetryConfig,
	TelemetryConfigLayer,
};
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, DEFAULT_CONFIG_PATH,
};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("invalid configuration: {0}")]
	Validation(String),
}

/// Partial configuration produced by one source.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub telemetry: Option<TelemetryConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ConfigLayer {
	pub fn merge(&mut self, other: ConfigLayer) {
		if let Some(http) = other.http {
			self.http.get_or_insert_with(Default::default).merge(http);
		}
		if let Some(telemetry) = other.telemetry {
			self
				.telemetry
				.get_or_insert_with(Default::default)
				.merge(telemetry);
		}
		if let Some(logging) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(logging);
		}
	}
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebAnalyticsConfig {
	pub http: HttpConfig,
	pub telemetry: TelemetryConfig,
	pub logging: LoggingConfig,
}

impl WebAnalyticsConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Loads configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<PathBuf>,
) -> Result<WebAnalyticsConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Merges `sources` in precedence order and resolves the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<WebAnalyticsConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ConfigLayer) -> Result<WebAnalyticsConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let telemetry = layer.telemetry.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&telemetry)?;

	info!(
		host = %http.host,
		port = http.port,
		telemetry_enabled = telemetry.enabled,
		otlp_endpoint = %telemetry.otlp_endpoint,
		export_interval_secs = telemetry.export_interval.as_secs(),
		"Web analytics configuration loaded"
	);

	Ok(WebAnalyticsConfig {
		http,
		telemetry,
		logging,
	})
}

fn validate_config(telemetry: &TelemetryConfig) -> Result<(), ConfigError> {
	if telemetry.export_interval.is_zero() {
		return Err(ConfigError::Validation(
			"LOOM_WEB_ANALYTICS_EXPORT_INTERVAL_SECS must be greater than zero".to_string(),
		));
	}
	if telemetry.export_timeout.is_zero() {
		return Err(ConfigError::Validation(
			"LOOM_WEB_ANALYTICS_EXPORT_TIMEOUT_SECS must be greater than zero".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::time::Duration;

	fn env(pairs: &[(&str, &str)]) -> Box<dyn ConfigSource> {
		Box::new(EnvSource::from_map(
			pairs
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect::<HashMap<_, _>>(),
		))
	}

	#[test]
	fn test_defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource), env(&[])]).unwrap();
		assert_eq!(config, WebAnalyticsConfig::default());
		assert_eq!(config.socket_addr(), "0.0.0.0:3000");
	}

	#[test]
	fn test_env_overrides_file_overrides_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("web-analytics.toml");
		std::fs::write(
			&path,
			r#"
[http]
host = "127.0.0.1"
port = 4000

[telemetry]
otlp_endpoint = "http://file-collector:4317"
export_interval_secs = 60

[logging]
level = "warn"
"#,
		)
		.unwrap();

		// Deliberately listed out of order.
		let config = load_from_sources(vec![
			env(&[
				("LOOM_WEB_ANALYTICS_PORT", "5000"),
				("HOSTNAME", "web-7"),
			]),
			Box::new(TomlSource::new(&path)),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.http.host, "127.0.0.1");
		assert_eq!(config.http.port, 5000);
		assert_eq!(config.telemetry.otlp_endpoint, "http://file-collector:4317");
		assert_eq!(config.telemetry.export_interval, Duration::from_secs(60));
		assert_eq!(config.telemetry.host_name, "web-7");
		assert_eq!(config.logging.level, "warn");
	}

	#[test]
	fn test_zero_interval_is_rejected() {
		let result = load_from_sources(vec![env(&[(
			"LOOM_WEB_ANALYTICS_EXPORT_INTERVAL_SECS",
			"0",
		)])]);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_layer_merge_keeps_earlier_sections() {
		let mut base = ConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
			}),
			..Default::default()
		};
		base.merge(ConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				..Default::default()
			}),
			..Default::default()
		});

		assert_eq!(base.logging.unwrap().level.as_deref(), Some("debug"));
		assert_eq!(base.http.unwrap().port, Some(9000));
	}
}
