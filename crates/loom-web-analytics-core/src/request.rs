// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Payloads exchanged between the browsing context and the analytics endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{SessionData, SessionSummary};

/// Body of `POST /analytics/page-view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewRequest {
	pub pathname: String,
	pub user_agent: String,
	pub referrer: String,
	pub timestamp: DateTime<Utc>,
	pub session_data: SessionData,
	pub is_new_session: bool,
}

/// Body of `POST /analytics/session-end`.
pub type SessionEndRequest = SessionSummary;

/// Body of `POST /analytics/web-vital`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebVitalReport {
	pub name: String,
	pub value: f64,
	pub pathname: String,
	/// `good`, `needs-improvement` or `poor`, as rated by the browser library.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delta: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
}

/// Response envelope shared by all analytics endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ApiResponse {
	pub fn ok(message: impl Into<String>) -> Self {
		Self {
			success: true,
			message: Some(message.into()),
			error: None,
		}
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			success: false,
			message: None,
			error: Some(error.into()),
		}
	}
}
