// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the web analytics SDK.

use thiserror::Error;

/// Web analytics SDK errors.
#[derive(Debug, Error)]
pub enum WebAnalyticsSdkError {
	/// Base URL is missing or invalid.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error response.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// Session storage could not be read or written.
	#[error("session storage error: {0}")]
	Storage(#[from] std::io::Error),
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, WebAnalyticsSdkError>;
