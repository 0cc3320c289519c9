// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of analytics payloads to the serving process.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use loom_web_analytics_core::{PageViewRequest, SessionEndRequest, WebVitalReport};

use crate::error::{Result, WebAnalyticsSdkError};

pub const PAGE_VIEW_PATH: &str = "/analytics/page-view";
pub const SESSION_END_PATH: &str = "/analytics/session-end";
pub const WEB_VITAL_PATH: &str = "/analytics/web-vital";

/// Sends analytics payloads.
#[async_trait::async_trait]
pub trait AnalyticsTransport: Send + Sync {
	async fn send_page_view(&self, request: &PageViewRequest) -> Result<()>;

	async fn send_web_vital(&self, report: &WebVitalReport) -> Result<()>;

	/// Fire-and-forget delivery of the teardown payload.
	///
	/// Must return without waiting for the send; there is no acknowledgement,
	/// retry or cancellation.
	fn send_beacon(&self, request: SessionEndRequest);
}

/// JSON-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	base_url: String,
}

impl HttpTransport {
	pub fn new(base_url: impl Into<String>) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_secs(10))
			.build()?;
		Self::with_client(client, base_url)
	}

	pub fn with_client(client: Client, base_url: impl Into<String>) -> Result<Self> {
		let base_url = base_url.into();
		let parsed = reqwest::Url::parse(&base_url)
			.map_err(|_| WebAnalyticsSdkError::InvalidBaseUrl(base_url.clone()))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(WebAnalyticsSdkError::InvalidBaseUrl(base_url));
		}

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
		let response = self.client.post(self.url(path)).json(body).send().await?;

		let status = response.status();
		if status.is_success() {
			return Ok(());
		}

		let message = response.text().await.unwrap_or_default();
		Err(WebAnalyticsSdkError::ServerError {
			status: status.as_u16(),
			message,
		})
	}
}

#[async_trait::async_trait]
impl AnalyticsTransport for HttpTransport {
	async fn send_page_view(&self, request: &PageViewRequest) -> Result<()> {
		self.post_json(PAGE_VIEW_PATH, request).await
	}

	async fn send_web_vital(&self, report: &WebVitalReport) -> Result<()> {
		self.post_json(WEB_VITAL_PATH, report).await
	}

	fn send_beacon(&self, request: SessionEndRequest) {
		let handle = match tokio::runtime::Handle::try_current() {
			Ok(handle) => handle,
			Err(_) => {
				warn!(session_id = %request.session_id, "No async runtime, dropping session-end beacon");
				return;
			}
		};

		let transport = self.clone();
		handle.spawn(async move {
			match transport.post_json(SESSION_END_PATH, &request).await {
				Ok(()) => debug!(session_id = %request.session_id, "Session-end beacon delivered"),
				Err(e) => {
					warn!(session_id = %request.session_id, error = %e, "Session-end beacon failed")
				}
			}
		});
	}
}
