// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page-view tracking for one browsing context.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use loom_web_analytics_core::{PageViewRequest, WebVitalReport};

use crate::classifier::EventClassifier;
use crate::storage::SessionSlot;
use crate::store::SessionStore;
use crate::transport::AnalyticsTransport;

/// Observes navigations, teardown and web vitals in a browsing context and
/// forwards them to the analytics endpoints.
///
/// Delivery failures are logged and dropped.
pub struct PageViewTracker<S, T> {
	classifier: EventClassifier<S>,
	transport: T,
}

impl<S: SessionSlot, T: AnalyticsTransport> PageViewTracker<S, T> {
	pub fn new(slot: S, transport: T) -> Self {
		Self::with_store(SessionStore::new(slot), transport)
	}

	pub fn with_store(store: SessionStore<S>, transport: T) -> Self {
		Self {
			classifier: EventClassifier::new(store),
			transport,
		}
	}

	pub fn classifier(&self) -> &EventClassifier<S> {
		&self.classifier
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Records a navigation to `pathname` and sends the page-view payload.
	pub async fn track_page_view(
		&self,
		pathname: &str,
		referrer: &str,
		user_agent: &str,
	) -> PageViewRequest {
		self
			.track_page_view_at(pathname, referrer, user_agent, Utc::now())
			.await
	}

	pub async fn track_page_view_at(
		&self,
		pathname: &str,
		referrer: &str,
		user_agent: &str,
		now: DateTime<Utc>,
	) -> PageViewRequest {
		let classification = self.classifier.classify(pathname, referrer, now);

		let request = PageViewRequest {
			pathname: pathname.to_string(),
			user_agent: user_agent.to_string(),
			referrer: referrer.to_string(),
			timestamp: now,
			session_data: classification.session,
			is_new_session: classification.is_new_session,
		};

		if request.is_new_session {
			info!(
				session_id = %request.session_data.session_id,
				pathname = %pathname,
				"New session detected"
			);
		}
		debug!(
			pathname = %pathname,
			session_id = %request.session_data.session_id,
			page_views = request.session_data.page_view_count,
			"Tracking page view"
		);

		if let Err(e) = self.transport.send_page_view(&request).await {
			warn!(pathname = %pathname, error = %e, "Failed to track page view");
		}

		request
	}

	/// Beacons the session summary when the context is torn down.
	///
	/// Returns whether a beacon was handed to the transport. Never blocks.
	pub fn track_teardown(&self) -> bool {
		self.track_teardown_at(Utc::now())
	}

	pub fn track_teardown_at(&self, now: DateTime<Utc>) -> bool {
		let Some(summary) = self.classifier.finalize(now) else {
			debug!("No session at teardown");
			return false;
		};

		info!(
			session_id = %summary.session_id,
			page_views = summary.page_view_count,
			first_page = %summary.first_page,
			last_page = %summary.last_page,
			"Session ended"
		);
		self.transport.send_beacon(summary);
		true
	}

	/// Forwards a web-vital measurement taken on `pathname`.
	pub async fn report_web_vital(&self, name: &str, value: f64, pathname: &str) {
		self
			.send_web_vital(WebVitalReport {
				name: name.to_string(),
				value,
				pathname: pathname.to_string(),
				rating: None,
				delta: None,
				id: None,
			})
			.await;
	}

	/// Forwards a full web-vital report, including the library's rating.
	pub async fn send_web_vital(&self, report: WebVitalReport) {
		debug!(
			name = %report.name,
			value = report.value,
			pathname = %report.pathname,
			rating = ?report.rating,
			"Reporting web vital"
		);
		if let Err(e) = self.transport.send_web_vital(&report).await {
			warn!(name = %report.name, error = %e, "Failed to report web vital");
		}
	}

	/// Counts a custom event on the current session.
	pub fn track_event(&self, name: &str) {
		self.classifier.store().record_custom_event(name);
	}
}
