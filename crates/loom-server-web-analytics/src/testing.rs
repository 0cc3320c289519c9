// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for asserting on exported metrics in unit tests.

use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::data::{Histogram, HistogramDataPoint, Metric, Sum};
use opentelemetry_sdk::metrics::PeriodicReader;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::testing::metrics::InMemoryMetricExporter;

use crate::exporter::{ResourceAttributes, TelemetryContext};

/// A context whose reader exports into memory. Needs a multi-thread runtime.
pub(crate) fn in_memory_context() -> (TelemetryContext, InMemoryMetricExporter) {
	let exporter = InMemoryMetricExporter::default();
	let reader = PeriodicReader::builder(exporter.clone(), runtime::Tokio).build();
	let context = TelemetryContext::with_reader(reader, &ResourceAttributes::default());
	(context, exporter)
}

/// Flushes `context` and returns the metrics of the latest export.
pub(crate) async fn collect(
	context: &TelemetryContext,
	exporter: &InMemoryMetricExporter,
) -> Collected {
	context.flush().await.unwrap();
	Collected::latest(exporter)
}

pub(crate) struct Collected {
	metrics: Vec<Metric>,
}

fn same_attributes(actual: &[KeyValue], expected: &[KeyValue]) -> bool {
	actual.len() == expected.len() && expected.iter().all(|kv| actual.contains(kv))
}

impl Collected {
	pub(crate) fn latest(exporter: &InMemoryMetricExporter) -> Self {
		let metrics = exporter
			.get_finished_metrics()
			.unwrap()
			.pop()
			.map(|resource| {
				resource
					.scope_metrics
					.into_iter()
					.flat_map(|scope| scope.metrics)
					.collect()
			})
			.unwrap_or_default();
		Self { metrics }
	}

	fn metric(&self, name: &str) -> Option<&Metric> {
		self.metrics.iter().find(|m| m.name == name)
	}

	pub(crate) fn counter_value(&self, name: &str, attributes: &[KeyValue]) -> Option<u64> {
		let sum = self
			.metric(name)?
			.data
			.as_any()
			.downcast_ref::<Sum<u64>>()?;
		sum
			.data_points
			.iter()
			.find(|point| same_attributes(&point.attributes, attributes))
			.map(|point| point.value)
	}

	pub(crate) fn histogram_point(
		&self,
		name: &str,
		attributes: &[KeyValue],
	) -> Option<&HistogramDataPoint<f64>> {
		let histogram = self
			.metric(name)?
			.data
			.as_any()
			.downcast_ref::<Histogram<f64>>()?;
		histogram
			.data_points
			.iter()
			.find(|point| same_attributes(&point.attributes, attributes))
	}

	pub(crate) fn total_points(&self) -> usize {
		self
			.metrics
			.iter()
			.map(|metric| {
				let data = metric.data.as_any();
				if let Some(sum) = data.downcast_ref::<Sum<u64>>() {
					sum.data_points.len()
				} else if let Some(histogram) = data.downcast_ref::<Histogram<f64>>() {
					histogram.data_points.len()
				} else {
					0
				}
			})
			.sum()
	}
}
