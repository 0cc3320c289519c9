// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Classifies browsing-context observations against the stored session.

use chrono::{DateTime, Utc};

use loom_web_analytics_core::{SessionData, SessionSummary};

use crate::storage::SessionSlot;
use crate::store::SessionStore;

/// Outcome of classifying a navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
	pub session: SessionData,
	pub is_new_session: bool,
}

/// Decides whether a navigation starts or continues a session, and builds
/// the summary sent when the context tears down.
pub struct EventClassifier<S> {
	store: SessionStore<S>,
}

impl<S: SessionSlot> EventClassifier<S> {
	pub fn new(store: SessionStore<S>) -> Self {
		Self { store }
	}

	pub fn store(&self) -> &SessionStore<S> {
		&self.store
	}

	/// Counts a page view on `path`. A session is new iff this is its first page view.
	pub fn classify(&self, path: &str, referrer: &str, now: DateTime<Utc>) -> Classification {
		let session = self.store.get_or_create_at(path, referrer, now);
		let is_new_session = session.is_new_session();
		Classification {
			session,
			is_new_session,
		}
	}

	/// Summary of the stored session at teardown, `None` if there is no session.
	pub fn finalize(&self, now: DateTime<Utc>) -> Option<SessionSummary> {
		self.store.current().map(|session| session.summary(now))
	}
}
