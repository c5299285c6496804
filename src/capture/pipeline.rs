// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The capture pipeline
//!
//! One pipeline serves both capture paths. Every invocation ends in exactly
//! one completion, and no failure escapes to the host: unexpected errors are
//! logged, reported through the exception notification and swallowed.

use crate::config::{CaptureConfig, CookieOptions, NotifyOptions, SaltOptions};
use crate::error::Result;
use crate::extract;
use crate::http::{canonicalize, collect_segments, names, CookieRecord, Headers};
use crate::network::{CaptureKind, Dispatcher, Done, Route, TrafficContext, TrafficEvent};
use crate::notify::{self, MissingData, NotificationPayload, Notifier, Observation};
use crate::store::{keys, ChangeDetectingStore, KeyValueStore};

/// Outcome of one pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    /// Path the event was routed to
    pub kind: CaptureKind,
    /// Whether the primary value changed; `None` when nothing was stored
    pub changed: Option<bool>,
    /// Notification posted for this event, if any
    pub notification: Option<NotificationPayload>,
    /// Rendered error when the pipeline failed
    pub error: Option<String>,
    /// Completion handed back to the host
    pub done: Done,
}

impl CaptureReport {
    fn new(kind: CaptureKind, done: Done) -> Self {
        Self {
            kind,
            changed: None,
            notification: None,
            error: None,
            done,
        }
    }
}

/// Capture pipeline over an injected store and notifier
pub struct CapturePipeline<S, N> {
    store: ChangeDetectingStore<S>,
    notifier: N,
    dispatcher: Dispatcher,
}

impl<S: KeyValueStore, N: Notifier> CapturePipeline<S, N> {
    /// Create a pipeline for the built-in endpoints
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store: ChangeDetectingStore::new(store),
            notifier,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Use a custom dispatcher
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Store adapter
    pub fn store(&self) -> &ChangeDetectingStore<S> {
        &self.store
    }

    /// Notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Serve one host invocation and signal completion exactly once
    pub async fn handle<C: TrafficContext + ?Sized>(&self, ctx: &mut C) -> CaptureReport {
        let report = self.run(ctx.event(), ctx.argument()).await;
        ctx.done(report.done.clone());
        report
    }

    /// Process one event. Never fails.
    pub async fn run(&self, event: &TrafficEvent, argument: &str) -> CaptureReport {
        let config = CaptureConfig::parse(argument);
        let route = self.dispatcher.classify(event);
        let kind = route.kind();

        // Salt and unknown paths forward the response body untouched
        let done = match route {
            Route::Cookie { .. } => Done::empty(),
            _ => Done::with_body(event.response_body()),
        };
        let mut report = CaptureReport::new(kind, done);

        let result = match route {
            Route::Salt { body } => self.capture_salt(body, &config, &mut report).await,
            Route::Cookie { headers } => {
                self.capture_cookie(headers, &event.url, &config, &mut report)
                    .await
            }
            Route::Unknown { .. } => {
                tracing::debug!(url = %event.url, "No capture rule matched");
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!(url = %event.url, kind = %kind, error = %e, "Capture failed");

            let payload = notify::exception(&e);
            if let Err(post_err) = self.notifier.post(&payload).await {
                tracing::warn!(error = %post_err, "Exception notification failed");
            } else {
                report.notification = Some(payload);
            }
            report.error = Some(e.report());
        }

        report
    }

    async fn capture_salt(
        &self,
        body: &str,
        config: &CaptureConfig,
        report: &mut CaptureReport,
    ) -> Result<()> {
        let options = SaltOptions::from_config(config);
        let (record, method) = extract::extract_with_method(body);

        tracing::info!(
            salt = record.has_salt(),
            user_id = record.user_id.as_deref(),
            method = ?method,
            "Salt capture hit"
        );

        let Some(salt) = record.salt() else {
            return self
                .post(Observation::Missing(MissingData::SaltField), &options.notify, report)
                .await;
        };

        let write = self.store.write_if_changed(keys::SALT, salt)?;
        report.changed = Some(write.changed);

        if options.save_user_info {
            let fields = [
                (keys::USER_ID, &record.user_id),
                (keys::USER_NAME, &record.user_name),
                (keys::USER_HEAD_URL, &record.head_url),
            ];
            for (key, value) in fields {
                if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                    self.store.write(key, value)?;
                }
            }
        }

        self.store.write(keys::MIN_INFO, &record.summary_json()?)?;

        self.post(
            Observation::Salt {
                record: &record,
                write: &write,
            },
            &options.notify,
            report,
        )
        .await
    }

    async fn capture_cookie(
        &self,
        headers: &Headers,
        url: &str,
        config: &CaptureConfig,
        report: &mut CaptureReport,
    ) -> Result<()> {
        let options = CookieOptions::from_config(config);

        let segments = collect_segments(headers);
        if segments.is_empty() {
            tracing::warn!(url = %url, "Request carried no cookie header");
            return self
                .post(Observation::Missing(MissingData::CookieHeader), &options.notify, report)
                .await;
        }

        let cookie_string = canonicalize(&segments);
        if cookie_string.is_empty() {
            tracing::warn!(url = %url, segments = segments.len(), "Cookie headers were empty");
            return self
                .post(Observation::Missing(MissingData::EmptyCookie), &options.notify, report)
                .await;
        }

        let record = CookieRecord::new(cookie_string, headers.get(names::USER_AGENT), url);

        let write = self
            .store
            .write_if_changed(&options.store_key, &record.cookie_string)?;
        report.changed = Some(write.changed);

        if let Some(ua) = &record.user_agent {
            self.store.write(&options.user_agent_key(), ua)?;
        }
        self.store
            .write(&options.meta_key(), &serde_json::to_string(&record.meta())?)?;

        tracing::info!(
            store_key = %options.store_key,
            segments = segments.len(),
            cookie_len = record.cookie_string.len(),
            user_agent = record.user_agent.is_some(),
            changed = write.changed,
            "Cookie capture hit"
        );

        self.post(
            Observation::Cookie {
                record: &record,
                write: &write,
            },
            &options.notify,
            report,
        )
        .await
    }

    async fn post(
        &self,
        observation: Observation<'_>,
        options: &NotifyOptions,
        report: &mut CaptureReport,
    ) -> Result<()> {
        if let Some(payload) = notify::compose(observation, options) {
            self.notifier.post(&payload).await?;
            report.notification = Some(payload);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::CaptureError;
    use crate::network::ReplayContext;
    use crate::notify::{text, RecordingNotifier};
    use crate::store::MemoryStore;

    const LOGIN_URL: &str = "https://api3.ksapisrv.com/rest/nebula/user/login/mobile";
    const TASKS_URL: &str = "https://nebula.kuaishou.com/rest/n/nebula/activity/earn/overview/tasks";
    const LOGIN_BODY: &str =
        r#"{"kuaishou.api_client_salt":"S1","user":{"user_id":42,"user_name":"Bob"}}"#;

    fn pipeline() -> (CapturePipeline<MemoryStore, RecordingNotifier>, MemoryStore, RecordingNotifier) {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        (
            CapturePipeline::new(store.clone(), notifier.clone()),
            store,
            notifier,
        )
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<()> {
            Err(CaptureError::store(key, "read-only"))
        }
    }

    #[tokio::test]
    async fn test_salt_first_capture() {
        let (pipeline, store, notifier) = pipeline();
        let event = TrafficEvent::response(LOGIN_URL, LOGIN_BODY);

        let report = pipeline.run(&event, "").await;

        assert_eq!(report.kind, CaptureKind::Salt);
        assert_eq!(report.changed, Some(true));
        assert_eq!(report.done.body.as_deref(), Some(LOGIN_BODY));

        assert_eq!(store.read(keys::SALT).unwrap().as_deref(), Some("S1"));
        assert_eq!(store.read(keys::USER_ID).unwrap().as_deref(), Some("42"));
        assert_eq!(store.read(keys::USER_NAME).unwrap().as_deref(), Some("Bob"));
        assert_eq!(store.read(keys::USER_HEAD_URL).unwrap(), None);
        assert!(store.read(keys::MIN_INFO).unwrap().unwrap().contains("\"S1\""));

        let posted = notifier.payloads();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].title, text::SALT_TITLE);
        assert_eq!(posted[0].subtitle, "用户: Bob (42)");
        assert!(posted[0].body.contains("S1"));
    }

    #[tokio::test]
    async fn test_salt_unchanged_is_silent_but_stored() {
        let (pipeline, store, notifier) = pipeline();
        let event = TrafficEvent::response(LOGIN_URL, LOGIN_BODY);

        pipeline.run(&event, "").await;
        store.write(keys::USER_NAME, "stale").unwrap();

        let report = pipeline.run(&event, "").await;

        assert_eq!(report.changed, Some(false));
        assert!(report.notification.is_none());
        assert_eq!(notifier.count(), 1);
        // Auxiliary slots are refreshed on every hit
        assert_eq!(store.read(keys::USER_NAME).unwrap().as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn test_salt_notify_always() {
        let (pipeline, _store, notifier) = pipeline();
        let event = TrafficEvent::response(LOGIN_URL, LOGIN_BODY);

        pipeline.run(&event, "salt_notifyAlways=on").await;
        pipeline.run(&event, "salt_notifyAlways=on").await;

        assert_eq!(notifier.count(), 2);
    }

    #[tokio::test]
    async fn test_salt_missing_keeps_previous() {
        let (pipeline, store, notifier) = pipeline();
        store.write(keys::SALT, "OLD").unwrap();
        store.write(keys::MIN_INFO, "{\"api_client_salt\":\"OLD\"}").unwrap();

        let event = TrafficEvent::response(LOGIN_URL, r#"{"result":109,"error_msg":"busy"}"#);
        let report = pipeline.run(&event, "").await;

        assert_eq!(report.changed, None);
        assert_eq!(store.read(keys::SALT).unwrap().as_deref(), Some("OLD"));
        assert!(store.read(keys::MIN_INFO).unwrap().unwrap().contains("OLD"));
        assert_eq!(notifier.last().unwrap().title, text::SALT_MISSING_TITLE);
    }

    #[tokio::test]
    async fn test_salt_notify_off_and_user_info_off() {
        let (pipeline, store, notifier) = pipeline();
        let event = TrafficEvent::response(LOGIN_URL, LOGIN_BODY);

        let report = pipeline.run(&event, "notify=off&saveUserInfo=off").await;

        assert_eq!(report.changed, Some(true));
        assert_eq!(notifier.count(), 0);
        assert_eq!(store.read(keys::SALT).unwrap().as_deref(), Some("S1"));
        assert_eq!(store.read(keys::USER_ID).unwrap(), None);
    }

    #[tokio::test]
    async fn test_salt_fallback_body() {
        let (pipeline, store, _notifier) = pipeline();
        let body = r#"{"kuaishou.api_client_salt":"S9","user":{"user_id":7"#;
        let event = TrafficEvent::response(LOGIN_URL, body);

        let report = pipeline.run(&event, "").await;

        assert_eq!(report.done.body.as_deref(), Some(body));
        assert_eq!(store.read(keys::SALT).unwrap().as_deref(), Some("S9"));
        assert_eq!(store.read(keys::USER_ID).unwrap().as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_cookie_capture() {
        let (pipeline, store, notifier) = pipeline();
        let headers = Headers::new()
            .with("Cookie", "a=1; b=2")
            .with("Cookie#1", "a=9; c=flag")
            .with("User-Agent", "kwai-ios/11");
        let event = TrafficEvent::request(TASKS_URL, headers);

        let report = pipeline.run(&event, "").await;

        assert_eq!(report.kind, CaptureKind::Cookie);
        assert_eq!(report.done, Done::empty());
        assert_eq!(store.read("KS_EARN_COOKIE").unwrap().as_deref(), Some("a=9; b=2; c=flag"));
        assert_eq!(store.read("KS_EARN_COOKIE_UA").unwrap().as_deref(), Some("kwai-ios/11"));

        let meta: serde_json::Value =
            serde_json::from_str(&store.read("KS_EARN_COOKIE_META").unwrap().unwrap()).unwrap();
        assert_eq!(meta["cookie"], "a=9; b=2; c=flag");
        assert_eq!(meta["url"], TASKS_URL);

        let payload = notifier.last().unwrap();
        assert_eq!(payload.title, text::COOKIE_TITLE);
        assert_eq!(
            payload.clipboard(),
            Some("Cookie: a=9; b=2; c=flag\nUser-Agent: kwai-ios/11")
        );
    }

    /// Memory store that logs every written key
    #[derive(Default)]
    struct WriteLog {
        inner: MemoryStore,
        keys: parking_lot::Mutex<Vec<String>>,
    }

    impl WriteLog {
        fn writes_to(&self, key: &str) -> usize {
            self.keys.lock().iter().filter(|k| k.as_str() == key).count()
        }
    }

    impl KeyValueStore for WriteLog {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<()> {
            self.keys.lock().push(key.to_string());
            self.inner.write(key, value)
        }
    }

    fn meta_updated_at(store: &WriteLog) -> chrono::DateTime<chrono::FixedOffset> {
        let meta: serde_json::Value =
            serde_json::from_str(&store.read("KS_EARN_COOKIE_META").unwrap().unwrap()).unwrap();
        chrono::DateTime::parse_from_rfc3339(meta["updated_at"].as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_cookie_unchanged_still_rewritten() {
        let store = Arc::new(WriteLog::default());
        let notifier = RecordingNotifier::new();
        let pipeline = CapturePipeline::new(store.clone(), notifier.clone());
        let event = TrafficEvent::request(TASKS_URL, Headers::new().with("Cookie", "a=1; b=2"));

        let first = pipeline.run(&event, "").await;
        let first_stamp = meta_updated_at(&store);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = pipeline.run(&event, "").await;

        assert_eq!(first.changed, Some(true));
        assert_eq!(second.changed, Some(false));
        assert_eq!(notifier.count(), 1);
        assert_eq!(store.writes_to("KS_EARN_COOKIE"), 2);
        assert_eq!(store.writes_to("KS_EARN_COOKIE_META"), 2);
        assert!(meta_updated_at(&store) > first_stamp);
    }

    #[tokio::test]
    async fn test_salt_unchanged_primary_still_written() {
        let store = Arc::new(WriteLog::default());
        let pipeline = CapturePipeline::new(store.clone(), RecordingNotifier::new());
        let event = TrafficEvent::response(LOGIN_URL, LOGIN_BODY);

        pipeline.run(&event, "").await;
        let report = pipeline.run(&event, "").await;

        assert_eq!(report.changed, Some(false));
        assert_eq!(store.writes_to(keys::SALT), 2);
    }

    #[tokio::test]
    async fn test_cookie_long_value_truncated_in_body_only() {
        let (pipeline, store, notifier) = pipeline();
        let cookie = format!("token={}", "t".repeat(150));
        let event = TrafficEvent::request(TASKS_URL, Headers::new().with("cookie", cookie.as_str()));

        pipeline.run(&event, "cookie_storeKey=ALT&clipboard=off").await;

        assert_eq!(store.read("ALT").unwrap().as_deref(), Some(cookie.as_str()));
        assert_eq!(store.read("ALT_UA").unwrap(), None);

        let payload = notifier.last().unwrap();
        assert_eq!(payload.body.chars().count(), 97);
        assert!(payload.body.ends_with('…'));
        assert!(payload.attachment.is_none());
    }

    #[tokio::test]
    async fn test_cookie_missing_and_empty() {
        let (pipeline, store, notifier) = pipeline();

        let none = TrafficEvent::request(TASKS_URL, Headers::new().with("Accept", "*/*"));
        pipeline.run(&none, "").await;
        assert_eq!(notifier.last().unwrap().body, text::COOKIE_NO_HEADER);

        let blank = TrafficEvent::request(TASKS_URL, Headers::new().with("Cookie", ";; ;"));
        pipeline.run(&blank, "").await;
        assert_eq!(notifier.last().unwrap().body, text::COOKIE_EMPTY);

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_passes_body_through() {
        let (pipeline, store, notifier) = pipeline();
        let event = TrafficEvent::response("https://example.com/feed", "original");

        let report = pipeline.run(&event, "").await;

        assert_eq!(report.kind, CaptureKind::Unknown);
        assert_eq!(report.done.body.as_deref(), Some("original"));
        assert!(store.is_empty());
        assert_eq!(notifier.count(), 0);

        let request_only = TrafficEvent::request("https://example.com/feed", Headers::new());
        assert_eq!(pipeline.run(&request_only, "").await.done, Done::empty());
    }

    #[tokio::test]
    async fn test_store_failure_reports_exception() {
        let notifier = RecordingNotifier::new();
        let pipeline = CapturePipeline::new(ReadOnlyStore, notifier.clone());
        let event = TrafficEvent::response(LOGIN_URL, LOGIN_BODY);

        let report = pipeline.run(&event, "").await;

        assert!(report.error.unwrap().contains("read-only"));
        assert_eq!(report.done.body.as_deref(), Some(LOGIN_BODY));
        assert_eq!(notifier.last().unwrap().title, text::EXCEPTION_TITLE);
    }

    #[tokio::test]
    async fn test_handle_signals_done_once() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = CapturePipeline::new(store.clone(), RecordingNotifier::new());

        let mut ctx = ReplayContext::new(TrafficEvent::response(LOGIN_URL, LOGIN_BODY), "");
        pipeline.handle(&mut ctx).await;
        assert_eq!(ctx.completions.len(), 1);
        assert_eq!(ctx.completions[0].body.as_deref(), Some(LOGIN_BODY));

        let failing = CapturePipeline::new(ReadOnlyStore, RecordingNotifier::new());
        let mut ctx = ReplayContext::new(
            TrafficEvent::request(TASKS_URL, Headers::new().with("Cookie", "a=1")),
            "",
        );
        failing.handle(&mut ctx).await;
        assert_eq!(ctx.completions, vec![Done::empty()]);
    }
}
