// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Browsing-context session types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, WebAnalyticsError};

/// Referrer recorded when the landing page had none.
pub const DIRECT_REFERRER: &str = "direct";

/// Event key that mirrors `pageViewCount`.
pub const PAGE_VIEWS_EVENT: &str = "pageViews";

/// Opaque session identifier.
///
/// Locally generated ids are UUID v4 strings; ids received over the wire are
/// accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
	#[must_use]
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for SessionId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for SessionId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Per-session event counters.
///
/// Serializes as a flat object, `{"pageViews": 3, "signup_clicked": 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvents {
	#[serde(rename = "pageViews")]
	pub page_views: u64,
	#[serde(flatten)]
	pub custom: BTreeMap<String, u64>,
}

impl SessionEvents {
	fn first_page_view() -> Self {
		Self {
			page_views: 1,
			custom: BTreeMap::new(),
		}
	}

	/// Returns the count for an event name, `0` if it never occurred.
	#[must_use]
	pub fn get(&self, name: &str) -> u64 {
		if name == PAGE_VIEWS_EVENT {
			self.page_views
		} else {
			self.custom.get(name).copied().unwrap_or(0)
		}
	}
}

/// State of one visitor session, persisted in the browsing context's storage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
	pub session_id: SessionId,
	pub session_start_time: DateTime<Utc>,
	pub page_view_count: u64,
	pub first_page: String,
	pub last_page: String,
	pub last_activity_time: DateTime<Utc>,
	pub first_referrer: String,
	pub events: SessionEvents,
}

impl SessionData {
	/// Starts a session on its landing page.
	#[must_use]
	pub fn new(path: &str, referrer: &str, now: DateTime<Utc>) -> Self {
		Self {
			session_id: SessionId::generate(),
			session_start_time: now,
			page_view_count: 1,
			first_page: path.to_string(),
			last_page: path.to_string(),
			last_activity_time: now,
			first_referrer: normalize_referrer(referrer),
			events: SessionEvents::first_page_view(),
		}
	}

	/// Counts a further page view within this session.
	pub fn record_page_view(&mut self, path: &str, now: DateTime<Utc>) {
		self.page_view_count = self.page_view_count.saturating_add(1);
		self.events.page_views = self.events.page_views.saturating_add(1);
		self.last_page = path.to_string();
		self.last_activity_time = now;
	}

	/// Counts a custom event. Returns `false` for the reserved `pageViews` key,
	/// which only moves together with `page_view_count`.
	pub fn record_event(&mut self, name: &str, now: DateTime<Utc>) -> bool {
		if name == PAGE_VIEWS_EVENT {
			return false;
		}
		let count = self.events.custom.entry(name.to_string()).or_insert(0);
		*count = count.saturating_add(1);
		self.last_activity_time = now;
		true
	}

	/// True on the first observation of the session.
	#[must_use]
	pub fn is_new_session(&self) -> bool {
		self.page_view_count == 1
	}

	/// Summary delivered when the browsing context tears down.
	#[must_use]
	pub fn summary(&self, now: DateTime<Utc>) -> SessionSummary {
		SessionSummary {
			session_id: self.session_id.clone(),
			session_start_time: self.session_start_time,
			timestamp: now,
			page_view_count: self.page_view_count,
			first_page: self.first_page.clone(),
			last_page: self.last_page.clone(),
			first_referrer: self.first_referrer.clone(),
		}
	}

	/// Parses a stored session, rejecting payloads that break the counting
	/// invariants.
	pub fn from_json(raw: &str) -> Result<Self> {
		let session: Self = serde_json::from_str(raw)?;
		session.validate()?;
		Ok(session)
	}

	/// Checks the invariants every live session holds.
	pub fn validate(&self) -> Result<()> {
		if self.page_view_count == 0 {
			return Err(WebAnalyticsError::InconsistentSession(
				"pageViewCount is zero",
			));
		}
		if self.page_view_count != self.events.page_views {
			return Err(WebAnalyticsError::InconsistentSession(
				"pageViewCount differs from events.pageViews",
			));
		}
		if self.last_activity_time < self.session_start_time {
			return Err(WebAnalyticsError::InconsistentSession(
				"lastActivityTime precedes sessionStartTime",
			));
		}
		Ok(())
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}

/// Final state of a session, sent as the session-end payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
	pub session_id: SessionId,
	pub session_start_time: DateTime<Utc>,
	pub timestamp: DateTime<Utc>,
	pub page_view_count: u64,
	pub first_page: String,
	pub last_page: String,
	pub first_referrer: String,
}

fn normalize_referrer(referrer: &str) -> String {
	if referrer.is_empty() {
		DIRECT_REFERRER.to_string()
	} else {
		referrer.to_string()
	}
}
