// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Names of the telemetry instruments and their label keys.

pub const SESSIONS_CREATED_TOTAL: &str = "sessions_created_total";
pub const PAGE_VIEWS_TOTAL: &str = "page_views_total";
pub const SESSION_DURATION_SECONDS: &str = "session_duration_seconds";
pub const FCP_MILLISECONDS: &str = "fcp_milliseconds";
pub const LCP_MILLISECONDS: &str = "lcp_milliseconds";
pub const CLS_SCORE: &str = "cls_score";
pub const TTFB_MILLISECONDS: &str = "ttfb_milliseconds";
pub const INP_MILLISECONDS: &str = "inp_milliseconds";

pub mod labels {
	pub const LANDING_PAGE: &str = "landing_page";
	pub const REFERRER: &str = "referrer";
	pub const PATHNAME: &str = "pathname";
}
