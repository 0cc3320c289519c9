// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for web analytics core types.

use thiserror::Error;

/// Errors raised while interpreting web analytics values.
#[derive(Debug, Error)]
pub enum WebAnalyticsError {
	/// Web vital name with no matching histogram
	#[error("unknown web vital: {0}")]
	UnknownWebVital(String),

	/// Persisted or transmitted session payload could not be parsed
	#[error("invalid session data: {0}")]
	InvalidSessionData(#[from] serde_json::Error),

	/// Session payload parsed but breaks the session invariants
	#[error("inconsistent session data: {0}")]
	InconsistentSession(&'static str),
}

pub type Result<T> = std::result::Result<T, WebAnalyticsError>;
