// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Maps classified events onto metric instruments.

use opentelemetry::metrics::Meter;
use opentelemetry::KeyValue;
use tracing::{debug, error, warn};

use loom_web_analytics_core::instruments::{self, labels};
use loom_web_analytics_core::{MetricEvent, WebVitalKind};

use crate::metrics::WebAnalyticsMetrics;

/// Records [`MetricEvent`]s. Safe to share across handlers.
pub struct MetricsRecorder {
	metrics: WebAnalyticsMetrics,
}

fn landing(landing_page: String, referrer: String) -> [KeyValue; 2] {
	[
		KeyValue::new(labels::LANDING_PAGE, landing_page),
		KeyValue::new(labels::REFERRER, referrer),
	]
}

impl MetricsRecorder {
	pub fn new(meter: &Meter) -> Self {
		Self {
			metrics: WebAnalyticsMetrics::new(meter),
		}
	}

	pub fn metrics(&self) -> &WebAnalyticsMetrics {
		&self.metrics
	}

	pub fn on_event(&self, event: MetricEvent) {
		match event {
			MetricEvent::SessionCreated {
				landing_page,
				referrer,
			} => {
				self.add(
					instruments::SESSIONS_CREATED_TOTAL,
					&landing(landing_page, referrer),
				);
			}
			MetricEvent::PageView { pathname } => {
				self.add(
					instruments::PAGE_VIEWS_TOTAL,
					&[KeyValue::new(labels::PATHNAME, pathname)],
				);
			}
			MetricEvent::SessionDuration {
				seconds,
				landing_page,
				referrer,
			} => {
				let seconds = if seconds < 0.0 {
					debug!(seconds, "Clamping negative session duration");
					0.0
				} else {
					seconds
				};
				self.record(
					instruments::SESSION_DURATION_SECONDS,
					seconds,
					&landing(landing_page, referrer),
				);
			}
			MetricEvent::WebVital {
				name,
				value,
				pathname,
			} => {
				let Some(kind) = WebVitalKind::from_name(&name) else {
					debug!(name = %name, pathname = %pathname, "Ignoring unmapped web vital");
					return;
				};
				self.record(
					kind.instrument_name(),
					value,
					&[KeyValue::new(labels::PATHNAME, pathname)],
				);
			}
		}
	}

	fn add(&self, name: &str, attributes: &[KeyValue]) {
		match self.metrics.counter(name) {
			Some(counter) => counter.add(1, attributes),
			None => error!(instrument = name, "Counter missing from catalog"),
		}
	}

	fn record(&self, name: &str, value: f64, attributes: &[KeyValue]) {
		if value.is_nan() {
			warn!(instrument = name, "Dropping NaN sample");
			return;
		}
		match self.metrics.histogram(name) {
			Some(histogram) => histogram.record(value, attributes),
			None => error!(instrument = name, "Histogram missing from catalog"),
		}
	}
}
