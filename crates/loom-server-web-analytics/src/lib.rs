// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Web analytics telemetry server for Loom.
//!
//! Receives page-view, session-end and web-vital beacons from the browser SDK,
//! records them on OpenTelemetry instruments and periodically pushes the
//! cumulative state to an OTLP collector.
//!
//! # Architecture
//!
//! - `handlers` / `routes` - the `/analytics/*` endpoints
//! - `recorder` - maps classified events onto instruments
//! - `metrics` / `catalog` - counters and explicit-bucket histograms
//! - `exporter` / `otlp` - the meter provider, its periodic reader and the OTLP/gRPC exporter
//! - `config` - layered configuration (defaults, TOML, environment)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use loom_server_web_analytics::{
//!     create_router, periodic_reader, ExporterConfig, TelemetryContext, WebAnalyticsState,
//! };
//!
//! let config = ExporterConfig::default();
//! let reader = periodic_reader(&config)?;
//! let telemetry = Arc::new(TelemetryContext::with_reader(reader, &config.resource));
//! let app = create_router(WebAnalyticsState::new(telemetry.clone()));
//! axum::serve(listener, app).await?;
//! telemetry.shutdown().await;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod exporter;
pub mod handlers;
pub mod metrics;
pub mod otlp;
pub mod recorder;
pub mod routes;

#[cfg(test)]
mod testing;

pub use catalog::{InstrumentDescriptor, InstrumentKind, CATALOG};
pub use error::{Result, TelemetryError};
pub use exporter::{ExporterConfig, ResourceAttributes, TelemetryContext};
pub use handlers::{client_ip, WebAnalyticsState};
pub use metrics::WebAnalyticsMetrics;
pub use otlp::{metric_exporter, periodic_reader};
pub use recorder::MetricsRecorder;
pub use routes::create_router;

pub use loom_web_analytics_core::*;
