// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # kscapture - Proxy-Script Credential Capture
//!
//! Captures Kuaishou session credentials from intercepted traffic inside a
//! rewriting proxy host.
//!
//! ## Features
//!
//! - Salt capture: `api_client_salt` plus user identity from login responses
//! - Cookie capture: merged, deduplicated cookie string from task-center requests
//! - Change detection: notify only when a stored value actually changed
//! - Argument aliases: one argument string configures both capture paths
//! - Pluggable host: store and notifier are traits, with in-memory, JSON file
//!   and logging implementations included
//!
//! ## Example
//!
//! ```rust,no_run
//! use kscapture::{CapturePipeline, LogNotifier, MemoryStore, ReplayContext, TrafficEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = CapturePipeline::new(MemoryStore::new(), LogNotifier);
//!
//!     let event = TrafficEvent::response(
//!         "https://api3.ksapisrv.com/rest/nebula/user/login/mobile",
//!         r#"{"kuaishou.api_client_salt":"S1","user":{"user_id":42}}"#,
//!     );
//!     let mut ctx = ReplayContext::new(event, "notifyAlways=on");
//!
//!     let report = pipeline.handle(&mut ctx).await;
//!     println!("{} changed={:?}", report.kind, report.changed);
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod network;
pub mod notify;
pub mod store;

// Re-exports for convenience

// Pipeline
pub use capture::{CapturePipeline, CaptureReport};

// Configuration
pub use config::{CaptureConfig, CookieOptions, NotifyOptions, SaltOptions};

// Extraction
pub use extract::{ExtractionMethod, SaltRecord};

// HTTP
pub use http::{CookieRecord, CookieSet, Headers};

// Traffic events and routing
pub use network::{CaptureKind, Dispatcher, Done, ReplayContext, TrafficContext, TrafficEvent};

// Notifications
pub use notify::{LogNotifier, NotificationPayload, Notifier, RecordingNotifier};

// Storage
pub use store::{ChangeDetectingStore, JsonFileStore, KeyValueStore, MemoryStore, WriteOutcome};

// Error
pub use error::{CaptureError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
