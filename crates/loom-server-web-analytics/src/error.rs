// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for telemetry export.

use thiserror::Error;

/// Telemetry errors. Only exporter construction is fatal at startup; flush
/// failures are logged and the next interval proceeds.
#[derive(Debug, Error)]
pub enum TelemetryError {
	/// Collector endpoint is not an http(s) URI.
	#[error("invalid collector endpoint: {0}")]
	InvalidEndpoint(String),

	/// The OTLP exporter could not be built.
	#[error("failed to build metrics exporter: {0}")]
	Exporter(String),

	/// Collecting or exporting metrics on demand failed.
	#[error("metrics flush failed: {0}")]
	Flush(String),

	/// The blocking flush task panicked or was cancelled.
	#[error("telemetry task failed: {0}")]
	Task(#[from] tokio::task::JoinError),
}

/// Result type alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
