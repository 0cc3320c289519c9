// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{routing::post, Router};

use crate::handlers::{page_view, session_end, web_vital, WebAnalyticsState};

pub fn create_router(state: WebAnalyticsState) -> Router {
	Router::new()
		.route("/analytics/page-view", post(page_view))
		.route("/analytics/session-end", post(session_end))
		.route("/analytics/web-vital", post(web_vital))
		.with_state(state)
}
