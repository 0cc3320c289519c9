// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML file and environment.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, trace};

use super::sections::{HttpConfigLayer, LoggingConfigLayer, TelemetryConfigLayer};
use super::{ConfigError, ConfigLayer};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/loom/web-analytics.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(ConfigLayer::default())
	}
}

/// TOML file source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `LOOM_WEB_ANALYTICS_<FIELD>`, plus the standard
/// `OTEL_EXPORTER_OTLP_ENDPOINT` and `HOSTNAME`.
#[derive(Default)]
pub struct EnvSource {
	overrides: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads from a fixed map instead of the process environment.
	pub fn from_map(vars: HashMap<String, String>) -> Self {
		Self {
			overrides: Some(vars),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		let value = match &self.overrides {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Result<Option<bool>, ConfigError> {
		match self.var(name) {
			Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(Some(true)),
			Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(Some(false)),
			Some(v) => Err(ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid bool value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn parsed<T: std::str::FromStr>(&self, name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {kind} value '{v}'"),
			}),
			None => Ok(None),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ConfigLayer {
			http: Some(HttpConfigLayer {
				host: self.var("LOOM_WEB_ANALYTICS_HOST"),
				port: self.parsed("LOOM_WEB_ANALYTICS_PORT", "u16")?,
			}),
			telemetry: Some(TelemetryConfigLayer {
				enabled: self.bool("LOOM_WEB_ANALYTICS_TELEMETRY_ENABLED")?,
				otlp_endpoint: self.var("OTEL_EXPORTER_OTLP_ENDPOINT"),
				host_name: self.var("HOSTNAME"),
				export_interval_secs: self.parsed("LOOM_WEB_ANALYTICS_EXPORT_INTERVAL_SECS", "u64")?,
				export_timeout_secs: self.parsed("LOOM_WEB_ANALYTICS_EXPORT_TIMEOUT_SECS", "u64")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: self.var("LOOM_WEB_ANALYTICS_LOG_LEVEL"),
			}),
		})
	}
}
