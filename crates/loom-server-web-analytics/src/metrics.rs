// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The catalog's instruments, created once against an OpenTelemetry meter.

use std::collections::HashMap;

use opentelemetry::metrics::{Counter, Histogram, Meter};

use crate::catalog::{InstrumentKind, CATALOG};

/// Counters and explicit-bucket histograms for every [`CATALOG`] entry.
///
/// Aggregation is done by the SDK: measurements on the same instrument and
/// attribute set from any number of threads are summed without loss, and
/// export is always cumulative.
pub struct WebAnalyticsMetrics {
	counters: HashMap<&'static str, Counter<u64>>,
	histograms: HashMap<&'static str, Histogram<f64>>,
}

impl WebAnalyticsMetrics {
	pub fn new(meter: &Meter) -> Self {
		let mut counters = HashMap::new();
		let mut histograms = HashMap::new();

		for descriptor in CATALOG {
			match descriptor.kind {
				InstrumentKind::Counter => {
					let counter = meter
						.u64_counter(descriptor.name)
						.with_description(descriptor.description)
						.with_unit(descriptor.unit)
						.build();
					counters.insert(descriptor.name, counter);
				}
				InstrumentKind::Histogram => {
					let histogram = meter
						.f64_histogram(descriptor.name)
						.with_description(descriptor.description)
						.with_unit(descriptor.unit)
						.with_boundaries(descriptor.boundaries.to_vec())
						.build();
					histograms.insert(descriptor.name, histogram);
				}
			}
		}

		Self {
			counters,
			histograms,
		}
	}

	pub fn counter(&self, name: &str) -> Option<&Counter<u64>> {
		self.counters.get(name)
	}

	pub fn histogram(&self, name: &str) -> Option<&Histogram<f64>> {
		self.histograms.get(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{collect, in_memory_context};
	use loom_web_analytics_core::instruments::{self, labels};
	use opentelemetry::KeyValue;

	#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
	async fn test_every_catalog_entry_has_an_instrument() {
		let (context, _exporter) = in_memory_context();
		let metrics = context.recorder().metrics();
		for descriptor in CATALOG {
			let found = match descriptor.kind {
				InstrumentKind::Counter => metrics.counter(descriptor.name).is_some(),
				InstrumentKind::Histogram => metrics.histogram(descriptor.name).is_some(),
			};
			assert!(found, "{} missing", descriptor.name);
		}
		assert!(metrics.counter(instruments::CLS_SCORE).is_none());
		assert!(metrics.histogram("unknown").is_none());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
	async fn test_histograms_use_catalog_boundaries() {
		let (context, exporter) = in_memory_context();
		let attributes = [KeyValue::new(labels::PATHNAME, "/")];
		let cls = context
			.recorder()
			.metrics()
			.histogram(instruments::CLS_SCORE)
			.unwrap();
		cls.record(0.04, &attributes);
		cls.record(0.9, &attributes);

		let collected = collect(&context, &exporter).await;
		let point = collected
			.histogram_point(instruments::CLS_SCORE, &attributes)
			.unwrap();
		assert_eq!(point.bounds, vec![0.025, 0.05, 0.1, 0.15, 0.25, 0.5]);
		assert_eq!(point.bucket_counts, vec![0, 1, 0, 0, 0, 0, 1]);
		assert_eq!(point.count, 2);
		assert_eq!(point.min, Some(0.04));
		assert_eq!(point.max, Some(0.9));
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
	async fn test_boundary_value_lands_in_its_own_bucket() {
		let (context, exporter) = in_memory_context();
		let attributes = [
			KeyValue::new(labels::LANDING_PAGE, "/"),
			KeyValue::new(labels::REFERRER, "direct"),
		];
		let duration = context
			.recorder()
			.metrics()
			.histogram(instruments::SESSION_DURATION_SECONDS)
			.unwrap();
		duration.record(5.0, &attributes);
		duration.record(86_400.0, &attributes);

		let collected = collect(&context, &exporter).await;
		let point = collected
			.histogram_point(instruments::SESSION_DURATION_SECONDS, &attributes)
			.unwrap();
		assert_eq!(point.bucket_counts, vec![1, 0, 0, 0, 0, 0, 0, 1]);
		assert_eq!(point.sum, 86_405.0);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
	async fn test_concurrent_updates_lose_nothing() {
		const THREADS: usize = 8;
		const PER_THREAD: usize = 1_000;

		let (context, exporter) = in_memory_context();
		let metrics = context.recorder().metrics();
		let attributes = [KeyValue::new(labels::PATHNAME, "/pricing")];

		std::thread::scope(|scope| {
			for _ in 0..THREADS {
				scope.spawn(|| {
					let counter = metrics.counter(instruments::PAGE_VIEWS_TOTAL).unwrap();
					let histogram = metrics.histogram(instruments::LCP_MILLISECONDS).unwrap();
					for _ in 0..PER_THREAD {
						counter.add(1, &attributes);
						histogram.record(1000.0, &attributes);
					}
				});
			}
		});

		let expected = (THREADS * PER_THREAD) as u64;
		let collected = collect(&context, &exporter).await;
		assert_eq!(
			collected.counter_value(instruments::PAGE_VIEWS_TOTAL, &attributes),
			Some(expected)
		);
		let point = collected
			.histogram_point(instruments::LCP_MILLISECONDS, &attributes)
			.unwrap();
		assert_eq!(point.count, expected);
		assert_eq!(point.bucket_counts[1], expected);
		assert_eq!(point.sum, 1000.0 * expected as f64);
	}
}
