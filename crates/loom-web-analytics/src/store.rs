// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session store: one live [`SessionData`] per browsing context.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use loom_web_analytics_core::SessionData;

use crate::storage::SessionSlot;

/// Key the session is stored under in browser session storage.
pub const SESSION_STORAGE_KEY: &str = "sessionData";

/// Configuration for the session store.
#[derive(Debug, Clone, Default)]
pub struct SessionStoreConfig {
	/// Inactivity after which the stored session counts as absent.
	///
	/// `None` keeps a session for the whole browsing context.
	pub idle_timeout: Option<Duration>,
}

/// Owns the session kept in a [`SessionSlot`].
///
/// Every mutating call is a read-modify-write of the slot. Storage and parse
/// failures never reach the caller: unreadable content is replaced by a new
/// session and failed writes are logged.
pub struct SessionStore<S> {
	slot: S,
	config: SessionStoreConfig,
}

impl<S: SessionSlot> SessionStore<S> {
	pub fn new(slot: S) -> Self {
		Self::with_config(slot, SessionStoreConfig::default())
	}

	pub fn with_config(slot: S, config: SessionStoreConfig) -> Self {
		Self { slot, config }
	}

	/// Returns the session for this context, counting a page view on `path`.
	pub fn get_or_create(&self, path: &str, referrer: &str) -> SessionData {
		self.get_or_create_at(path, referrer, Utc::now())
	}

	pub fn get_or_create_at(&self, path: &str, referrer: &str, now: DateTime<Utc>) -> SessionData {
		let session = match self.load_live(now) {
			Some(mut session) => {
				session.record_page_view(path, now);
				session
			}
			None => {
				let session = SessionData::new(path, referrer, now);
				debug!(
					session_id = %session.session_id,
					first_page = %session.first_page,
					referrer = %session.first_referrer,
					"Created new session"
				);
				session
			}
		};

		self.persist(&session);
		session
	}

	/// Counts a custom event on the current session. No-op without a session.
	pub fn record_custom_event(&self, name: &str) {
		self.record_custom_event_at(name, Utc::now());
	}

	pub fn record_custom_event_at(&self, name: &str, now: DateTime<Utc>) {
		let Some(mut session) = self.load_live(now) else {
			debug!(event = %name, "No session, dropping custom event");
			return;
		};

		if !session.record_event(name, now) {
			warn!(event = %name, "Ignoring custom event with reserved name");
			return;
		}

		self.persist(&session);
	}

	/// The session currently in the slot, without touching it.
	pub fn current(&self) -> Option<SessionData> {
		self.load()
	}

	/// Empties the slot; the next page view starts a new session.
	pub fn clear(&self) {
		if let Err(e) = self.slot.clear() {
			warn!(error = %e, "Failed to clear session slot");
		}
	}

	fn load(&self) -> Option<SessionData> {
		let raw = self.slot.load()?;
		match SessionData::from_json(&raw) {
			Ok(session) => Some(session),
			Err(e) => {
				warn!(error = %e, "Discarding unreadable session data");
				None
			}
		}
	}

	fn load_live(&self, now: DateTime<Utc>) -> Option<SessionData> {
		let session = self.load()?;
		match self.config.idle_timeout {
			Some(timeout) if now - session.last_activity_time > timeout => {
				debug!(
					session_id = %session.session_id,
					last_activity = %session.last_activity_time,
					"Session expired after inactivity"
				);
				None
			}
			_ => Some(session),
		}
	}

	fn persist(&self, session: &SessionData) {
		let raw = match session.to_json() {
			Ok(raw) => raw,
			Err(e) => {
				warn!(error = %e, "Failed to serialize session data");
				return;
			}
		};
		if let Err(e) = self.slot.store(&raw) {
			warn!(session_id = %session.session_id, error = %e, "Failed to persist session data");
		}
	}
}
