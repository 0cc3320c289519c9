// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router-level tests for the analytics endpoints.

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Request, StatusCode},
	Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::data::{Histogram, HistogramDataPoint, Metric, Sum};
use opentelemetry_sdk::metrics::PeriodicReader;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::testing::metrics::InMemoryMetricExporter;
use tower::ServiceExt;

use loom_server_web_analytics::instruments::{self, labels};
use loom_server_web_analytics::{
	create_router, ApiResponse, PageViewRequest, ResourceAttributes, SessionData,
	TelemetryContext, WebAnalyticsState,
};

fn t0() -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

struct TestApp {
	router: Router,
	telemetry: Arc<TelemetryContext>,
	exporter: InMemoryMetricExporter,
}

fn app() -> TestApp {
	let exporter = InMemoryMetricExporter::default();
	let reader = PeriodicReader::builder(exporter.clone(), runtime::Tokio).build();
	let telemetry = Arc::new(TelemetryContext::with_reader(
		reader,
		&ResourceAttributes::default(),
	));
	let router = create_router(WebAnalyticsState::new(Arc::clone(&telemetry)));
	TestApp {
		router,
		telemetry,
		exporter,
	}
}

/// Metrics from the latest flush.
struct Exported(Vec<Metric>);

impl Exported {
	fn metric(&self, name: &str) -> Option<&Metric> {
		self.0.iter().find(|m| m.name == name)
	}

	fn counter_value(&self, name: &str, attributes: &[KeyValue]) -> Option<u64> {
		let sum = self.metric(name)?.data.as_any().downcast_ref::<Sum<u64>>()?;
		sum
			.data_points
			.iter()
			.find(|p| same_attributes(&p.attributes, attributes))
			.map(|p| p.value)
	}

	fn histogram_point(&self, name: &str, attributes: &[KeyValue]) -> Option<&HistogramDataPoint<f64>> {
		let histogram = self
			.metric(name)?
			.data
			.as_any()
			.downcast_ref::<Histogram<f64>>()?;
		histogram
			.data_points
			.iter()
			.find(|p| same_attributes(&p.attributes, attributes))
	}

	fn has_points(&self, name: &str) -> bool {
		self.metric(name).is_some()
	}

	fn names(&self) -> Vec<&str> {
		self.0.iter().map(|m| m.name.as_ref()).collect()
	}
}

fn same_attributes(actual: &[KeyValue], expected: &[KeyValue]) -> bool {
	actual.len() == expected.len() && expected.iter().all(|kv| actual.contains(kv))
}

impl TestApp {
	async fn exported(&self) -> Exported {
		self.telemetry.flush().await.unwrap();
		let metrics = self
			.exporter
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
		Exported(metrics)
	}
}

async fn post(app: &Router, uri: &str, body: String) -> (StatusCode, ApiResponse) {
	let request = Request::builder()
		.method("POST")
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
		.body(Body::from(body))
		.unwrap();

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	(status, serde_json::from_slice(&bytes).unwrap())
}

fn page_view(session: &SessionData, pathname: &str, at: DateTime<Utc>) -> String {
	serde_json::to_string(&PageViewRequest {
		pathname: pathname.to_string(),
		user_agent: "Mozilla/5.0".to_string(),
		referrer: String::new(),
		timestamp: at,
		session_data: session.clone(),
		is_new_session: session.is_new_session(),
	})
	.unwrap()
}

fn landing(page: &str, referrer: &str) -> [KeyValue; 2] {
	[
		KeyValue::new(labels::LANDING_PAGE, page.to_string()),
		KeyValue::new(labels::REFERRER, referrer.to_string()),
	]
}

fn pathname(path: &str) -> [KeyValue; 1] {
	[KeyValue::new(labels::PATHNAME, path.to_string())]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_new_session_counts_a_created_session() {
	let test = app();
	let session = SessionData::new("/home", "", t0());

	let (status, body) = post(&test.router, "/analytics/page-view", page_view(&session, "/home", t0())).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, ApiResponse::ok("Page view tracked"));

	let exported = test.exported().await;
	assert_eq!(
		exported.counter_value(instruments::SESSIONS_CREATED_TOTAL, &landing("/home", "direct")),
		Some(1)
	);
	assert_eq!(
		exported.counter_value(instruments::PAGE_VIEWS_TOTAL, &pathname("/home")),
		Some(1)
	);
	assert!(!exported.has_points(instruments::SESSION_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_continuing_session_records_elapsed_duration() {
	let test = app();
	let mut session = SessionData::new("/home", "", t0());
	post(&test.router, "/analytics/page-view", page_view(&session, "/home", t0())).await;

	let later = t0() + Duration::milliseconds(42_500);
	session.record_page_view("/about", later);
	let (status, _) = post(&test.router, "/analytics/page-view", page_view(&session, "/about", later)).await;
	assert_eq!(status, StatusCode::OK);

	let exported = test.exported().await;
	assert_eq!(
		exported.counter_value(instruments::SESSIONS_CREATED_TOTAL, &landing("/home", "direct")),
		Some(1)
	);
	assert_eq!(
		exported.counter_value(instruments::PAGE_VIEWS_TOTAL, &pathname("/about")),
		Some(1)
	);
	let duration = exported
		.histogram_point(instruments::SESSION_DURATION_SECONDS, &landing("/home", "direct"))
		.unwrap();
	assert_eq!(duration.count, 1);
	assert_eq!(duration.sum, 42.5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_lcp_touches_only_its_histogram() {
	let test = app();
	let body = serde_json::json!({
		"name": "LCP",
		"value": 2600,
		"pathname": "/about",
		"rating": "needs-improvement"
	});

	let (status, response) = post(&test.router, "/analytics/web-vital", body.to_string()).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(response, ApiResponse::ok("Web vital tracked"));

	let exported = test.exported().await;
	assert_eq!(exported.names(), vec![instruments::LCP_MILLISECONDS]);
	let point = exported
		.histogram_point(instruments::LCP_MILLISECONDS, &pathname("/about"))
		.unwrap();
	assert_eq!(point.count, 1);
	assert_eq!(point.sum, 2600.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_unknown_web_vital_is_accepted_but_not_recorded() {
	let test = app();
	let body = serde_json::json!({"name": "FID", "value": 12.0, "pathname": "/"});

	let (status, _) = post(&test.router, "/analytics/web-vital", body.to_string()).await;
	assert_eq!(status, StatusCode::OK);
	assert!(test.exported().await.names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_session_end_with_clock_skew_records_zero() {
	let test = app();
	let summary = SessionData::new("/home", "https://news.example.com", t0())
		.summary(t0() - Duration::seconds(5));

	let (status, body) = post(
		&test.router,
		"/analytics/session-end",
		serde_json::to_string(&summary).unwrap(),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, ApiResponse::ok("Session ended"));

	let exported = test.exported().await;
	let point = exported
		.histogram_point(
			instruments::SESSION_DURATION_SECONDS,
			&landing("/home", "https://news.example.com"),
		)
		.unwrap();
	assert_eq!(point.count, 1);
	assert_eq!(point.sum, 0.0);
	assert_eq!(point.min, Some(0.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_malformed_bodies_get_the_failure_envelope() {
	let test = app();

	for (uri, error) in [
		("/analytics/page-view", "Failed to process page view"),
		("/analytics/session-end", "Failed to process session end"),
		("/analytics/web-vital", "Failed to process web vital"),
	] {
		let (status, body) = post(&test.router, uri, "{not json".to_string()).await;
		assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
		assert_eq!(body, ApiResponse::failed(error));

		let (status, _) = post(&test.router, uri, r#"{"pathname": "/"}"#.to_string()).await;
		assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} missing fields");
	}

	assert!(test.exported().await.names().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_missing_content_type_is_rejected() {
	let test = app();
	let request = Request::builder()
		.method("POST")
		.uri("/analytics/web-vital")
		.body(Body::from(r#"{"name":"CLS","value":0.1,"pathname":"/"}"#))
		.unwrap();

	let response = test.router.clone().oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_only_post_is_routed() {
	let test = app();
	let request = Request::builder()
		.method("GET")
		.uri("/analytics/page-view")
		.body(Body::empty())
		.unwrap();

	let response = test.router.clone().oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
