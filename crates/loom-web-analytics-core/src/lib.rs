// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Loom web analytics.
//!
//! Shared between the browsing-context SDK (`loom-web-analytics`) and the
//! serving process (`loom-server-web-analytics`):
//!
//! - [`SessionData`] - the per-visitor session persisted in the browsing context
//! - [`PageViewRequest`], [`SessionEndRequest`], [`WebVitalReport`] - wire payloads
//! - [`MetricEvent`] - classified observations handed to the metrics recorder
//! - [`WebVitalKind`] - the closed set of web vitals and their histograms

pub mod error;
pub mod event;
pub mod instruments;
pub mod request;
pub mod session;
pub mod vital;

pub use error::{Result, WebAnalyticsError};
pub use event::{elapsed_seconds, MetricEvent};
pub use request::{ApiResponse, PageViewRequest, SessionEndRequest, WebVitalReport};
pub use session::{SessionData, SessionEvents, SessionId, SessionSummary, DIRECT_REFERRER};
pub use vital::WebVitalKind;
