// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Web vitals and the histogram each one is recorded into.

use serde::{Deserialize, Serialize};

use crate::error::WebAnalyticsError;
use crate::instruments;

/// A web vital with a dedicated histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebVitalKind {
	/// First Contentful Paint (ms)
	Fcp,
	/// Largest Contentful Paint (ms)
	Lcp,
	/// Cumulative Layout Shift (unitless)
	Cls,
	/// Time to First Byte (ms)
	Ttfb,
	/// Interaction to Next Paint (ms)
	Inp,
}

/// Reported metric names and the vital they feed. The framework's
/// pre-hydration paint is counted as a contentful paint.
const NAME_TABLE: &[(&str, WebVitalKind)] = &[
	("FCP", WebVitalKind::Fcp),
	("Next.js-before-hydration", WebVitalKind::Fcp),
	("LCP", WebVitalKind::Lcp),
	("CLS", WebVitalKind::Cls),
	("TTFB", WebVitalKind::Ttfb),
	("INP", WebVitalKind::Inp),
];

impl WebVitalKind {
	pub const ALL: [WebVitalKind; 5] = [
		WebVitalKind::Fcp,
		WebVitalKind::Lcp,
		WebVitalKind::Cls,
		WebVitalKind::Ttfb,
		WebVitalKind::Inp,
	];

	/// Looks up a reported metric name. Matching is exact.
	#[must_use]
	pub fn from_name(name: &str) -> Option<Self> {
		NAME_TABLE
			.iter()
			.find(|(reported, _)| *reported == name)
			.map(|(_, kind)| *kind)
	}

	#[must_use]
	pub fn instrument_name(self) -> &'static str {
		match self {
			WebVitalKind::Fcp => instruments::FCP_MILLISECONDS,
			WebVitalKind::Lcp => instruments::LCP_MILLISECONDS,
			WebVitalKind::Cls => instruments::CLS_SCORE,
			WebVitalKind::Ttfb => instruments::TTFB_MILLISECONDS,
			WebVitalKind::Inp => instruments::INP_MILLISECONDS,
		}
	}
}

impl std::fmt::Display for WebVitalKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			WebVitalKind::Fcp => write!(f, "FCP"),
			WebVitalKind::Lcp => write!(f, "LCP"),
			WebVitalKind::Cls => write!(f, "CLS"),
			WebVitalKind::Ttfb => write!(f, "TTFB"),
			WebVitalKind::Inp => write!(f, "INP"),
		}
	}
}

impl std::str::FromStr for WebVitalKind {
	type Err = WebAnalyticsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_name(s).ok_or_else(|| WebAnalyticsError::UnknownWebVital(s.to_string()))
	}
}
