// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use axum::{
	extract::{rejection::JsonRejection, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use tracing::{debug, info, instrument, warn};

use loom_web_analytics_core::{ApiResponse, PageViewRequest, SessionEndRequest, WebVitalReport};

use crate::exporter::TelemetryContext;

/// Shared state for the analytics endpoints.
#[derive(Clone)]
pub struct WebAnalyticsState {
	pub telemetry: Arc<TelemetryContext>,
}

impl WebAnalyticsState {
	pub fn new(telemetry: Arc<TelemetryContext>) -> Self {
		Self { telemetry }
	}
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers
		.get(name)
		.and_then(|v| v.to_str().ok())
		.map(str::trim)
		.filter(|v| !v.is_empty())
}

/// Best-effort client address for logging.
pub fn client_ip(headers: &HeaderMap) -> String {
	header(headers, "x-forwarded-for")
		.and_then(|s| s.split(',').next())
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.or_else(|| header(headers, "cf-connecting-ip"))
		.or_else(|| header(headers, "x-real-ip"))
		.unwrap_or("unknown")
		.to_string()
}

fn tracked(message: &str) -> Response {
	(StatusCode::OK, Json(ApiResponse::ok(message))).into_response()
}

fn rejected(error: &str, rejection: &JsonRejection, ip: &str) -> Response {
	warn!(
		client_ip = %ip,
		status = %rejection.status(),
		reason = %rejection.body_text(),
		"{error}"
	);
	(StatusCode::BAD_REQUEST, Json(ApiResponse::failed(error))).into_response()
}

#[instrument(skip_all)]
pub async fn page_view(
	State(state): State<WebAnalyticsState>,
	headers: HeaderMap,
	payload: Result<Json<PageViewRequest>, JsonRejection>,
) -> Response {
	let ip = client_ip(&headers);
	let Json(request) = match payload {
		Ok(payload) => payload,
		Err(rejection) => return rejected("Failed to process page view", &rejection, &ip),
	};

	if request.is_new_session {
		info!(
			session_id = %request.session_data.session_id,
			pathname = %request.pathname,
			referrer = %request.session_data.first_referrer,
			client_ip = %ip,
			"New session started"
		);
	}
	debug!(
		session_id = %request.session_data.session_id,
		pathname = %request.pathname,
		page_views = request.session_data.page_view_count,
		user_agent = %request.user_agent,
		client_ip = %ip,
		"Page view received"
	);

	let recorder = state.telemetry.recorder();
	for event in request.metric_events() {
		recorder.on_event(event);
	}

	tracked("Page view tracked")
}

#[instrument(skip_all)]
pub async fn session_end(
	State(state): State<WebAnalyticsState>,
	headers: HeaderMap,
	payload: Result<Json<SessionEndRequest>, JsonRejection>,
) -> Response {
	let ip = client_ip(&headers);
	let Json(request) = match payload {
		Ok(payload) => payload,
		Err(rejection) => return rejected("Failed to process session end", &rejection, &ip),
	};

	info!(
		session_id = %request.session_id,
		page_views = request.page_view_count,
		first_page = %request.first_page,
		last_page = %request.last_page,
		client_ip = %ip,
		"Session ended"
	);

	state.telemetry.recorder().on_event(request.metric_event());

	tracked("Session ended")
}

#[instrument(skip_all)]
pub async fn web_vital(
	State(state): State<WebAnalyticsState>,
	headers: HeaderMap,
	payload: Result<Json<WebVitalReport>, JsonRejection>,
) -> Response {
	let ip = client_ip(&headers);
	let Json(report) = match payload {
		Ok(payload) => payload,
		Err(rejection) => return rejected("Failed to process web vital", &rejection, &ip),
	};

	debug!(
		name = %report.name,
		value = report.value,
		pathname = %report.pathname,
		rating = ?report.rating,
		client_ip = %ip,
		"Web vital received"
	);

	state.telemetry.recorder().on_event(report.metric_event());

	tracked("Web vital tracked")
}
