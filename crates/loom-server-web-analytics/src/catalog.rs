// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The fixed set of instruments exported by the web analytics server.

use loom_web_analytics_core::instruments::*;

/// Counter or explicit-bucket histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
	Counter,
	Histogram,
}

/// Static description of one instrument.
#[derive(Debug, PartialEq)]
pub struct InstrumentDescriptor {
	pub name: &'static str,
	pub description: &'static str,
	pub unit: &'static str,
	pub kind: InstrumentKind,
	/// Ascending upper bounds; empty for counters.
	pub boundaries: &'static [f64],
}

const fn counter(
	name: &'static str,
	description: &'static str,
	unit: &'static str,
) -> InstrumentDescriptor {
	InstrumentDescriptor {
		name,
		description,
		unit,
		kind: InstrumentKind::Counter,
		boundaries: &[],
	}
}

const fn histogram(
	name: &'static str,
	description: &'static str,
	unit: &'static str,
	boundaries: &'static [f64],
) -> InstrumentDescriptor {
	InstrumentDescriptor {
		name,
		description,
		unit,
		kind: InstrumentKind::Histogram,
		boundaries,
	}
}

// Session duration: bounce < 5s, quick < 30s, brief < 2m, moderate < 10m,
// strong < 30m, very strong < 1h, extended beyond.
const SESSION_DURATION_BOUNDS: &[f64] = &[5.0, 30.0, 120.0, 600.0, 1800.0, 3600.0, 7200.0];

// Paint timings. Good < 1800ms (FCP) / 2500ms (LCP), poor >= 3000ms / 4000ms.
const PAINT_BOUNDS: &[f64] = &[600.0, 1200.0, 1800.0, 2500.0, 3000.0, 4000.0];

// Good < 0.1, poor >= 0.25.
const CLS_BOUNDS: &[f64] = &[0.025, 0.05, 0.1, 0.15, 0.25, 0.5];

// Good < 600ms, poor >= 1800ms.
const TTFB_BOUNDS: &[f64] = &[100.0, 300.0, 600.0, 1000.0, 1800.0, 3000.0];

// Good < 200ms, poor >= 500ms.
const INP_BOUNDS: &[f64] = &[50.0, 100.0, 200.0, 300.0, 500.0, 1000.0];

pub static CATALOG: &[InstrumentDescriptor] = &[
	counter(
		SESSIONS_CREATED_TOTAL,
		"Total number of unique sessions created",
		"1",
	),
	counter(PAGE_VIEWS_TOTAL, "Total number of page views", "1"),
	histogram(
		SESSION_DURATION_SECONDS,
		"Duration of sessions in seconds",
		"s",
		SESSION_DURATION_BOUNDS,
	),
	histogram(
		FCP_MILLISECONDS,
		"First Contentful Paint metric",
		"ms",
		PAINT_BOUNDS,
	),
	histogram(
		LCP_MILLISECONDS,
		"Largest Contentful Paint metric",
		"ms",
		PAINT_BOUNDS,
	),
	histogram(
		CLS_SCORE,
		"Cumulative Layout Shift metric (unitless)",
		"1",
		CLS_BOUNDS,
	),
	histogram(
		TTFB_MILLISECONDS,
		"Time to First Byte metric",
		"ms",
		TTFB_BOUNDS,
	),
	histogram(
		INP_MILLISECONDS,
		"Interaction to Next Paint metric",
		"ms",
		INP_BOUNDS,
	),
];
