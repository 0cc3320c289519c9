// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Browsing-context SDK for Loom web analytics.
//!
//! Keeps one session per browsing context in an injected [`SessionSlot`],
//! classifies each navigation as a new or continuing session, and ships the
//! resulting payloads to the analytics endpoints.
//!
//! # Example
//!
//! ```ignore
//! use loom_web_analytics::{HttpTransport, MemorySlot, PageViewTracker};
//!
//! let tracker = PageViewTracker::new(
//!     MemorySlot::new(),
//!     HttpTransport::new("https://app.example.com")?,
//! );
//!
//! tracker.track_page_view("/pricing", "https://news.ycombinator.com/", "Mozilla/5.0").await;
//! tracker.report_web_vital("LCP", 2140.0, "/pricing").await;
//!
//! // On pagehide / beforeunload
//! tracker.track_teardown();
//! ```

pub mod classifier;
pub mod error;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod transport;

pub use classifier::{Classification, EventClassifier};
pub use error::{Result, WebAnalyticsSdkError};
pub use storage::{FileSlot, MemorySlot, SessionSlot};
pub use store::{SessionStore, SessionStoreConfig, SESSION_STORAGE_KEY};
pub use tracker::PageViewTracker;
pub use transport::{AnalyticsTransport, HttpTransport};

pub use loom_web_analytics_core::*;
