// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Classified observations handed to the metrics recorder.

use chrono::{DateTime, Utc};

use crate::request::{PageViewRequest, SessionEndRequest, WebVitalReport};

/// One observation, ready to be mapped onto instruments.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
	SessionCreated {
		landing_page: String,
		referrer: String,
	},
	PageView {
		pathname: String,
	},
	SessionDuration {
		/// Fractional seconds; negative only under clock skew.
		seconds: f64,
		landing_page: String,
		referrer: String,
	},
	WebVital {
		name: String,
		value: f64,
		pathname: String,
	},
}

/// Seconds from `start` to `end` at millisecond resolution. Not clamped.
#[must_use]
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
	(end - start).num_milliseconds() as f64 / 1000.0
}

impl PageViewRequest {
	/// Events produced by one page view.
	///
	/// A new session yields `SessionCreated` then `PageView`. A continuing
	/// session yields the session's elapsed time so far as a `SessionDuration`
	/// sample, then `PageView`.
	#[must_use]
	pub fn metric_events(&self) -> Vec<MetricEvent> {
		let first = if self.is_new_session {
			MetricEvent::SessionCreated {
				landing_page: self.pathname.clone(),
				referrer: self.session_data.first_referrer.clone(),
			}
		} else {
			MetricEvent::SessionDuration {
				seconds: elapsed_seconds(self.session_data.session_start_time, self.timestamp),
				landing_page: self.session_data.first_page.clone(),
				referrer: self.session_data.first_referrer.clone(),
			}
		};

		vec![
			first,
			MetricEvent::PageView {
				pathname: self.pathname.clone(),
			},
		]
	}
}

impl SessionEndRequest {
	/// The single duration sample of a finished session.
	#[must_use]
	pub fn metric_event(&self) -> MetricEvent {
		MetricEvent::SessionDuration {
			seconds: elapsed_seconds(self.session_start_time, self.timestamp),
			landing_page: self.first_page.clone(),
			referrer: self.first_referrer.clone(),
		}
	}
}

impl WebVitalReport {
	#[must_use]
	pub fn metric_event(&self) -> MetricEvent {
		MetricEvent::WebVital {
			name: self.name.clone(),
			value: self.value,
			pathname: self.pathname.clone(),
		}
	}
}
