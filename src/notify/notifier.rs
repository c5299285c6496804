// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Notification delivery
//!
//! The host's notification facility sits behind [`Notifier`]. Delivery is
//! async because some hosts only confirm a post after it was queued.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::payload::NotificationPayload;
use crate::error::Result;

/// Notification facility supplied by the host
///
/// # Example
///
/// ```rust,no_run
/// use kscapture::notify::{Notifier, NotificationPayload};
/// use async_trait::async_trait;
///
/// struct Stdout;
///
/// #[async_trait]
/// impl Notifier for Stdout {
///     async fn post(&self, payload: &NotificationPayload) -> kscapture::Result<()> {
///         println!("{}: {}", payload.title, payload.body);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post one notification
    async fn post(&self, payload: &NotificationPayload) -> Result<()>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn post(&self, payload: &NotificationPayload) -> Result<()> {
        (**self).post(payload).await
    }
}

/// Notifier that emits each payload as a structured log event
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn post(&self, payload: &NotificationPayload) -> Result<()> {
        let attachment = payload.attachment.as_ref();
        tracing::info!(
            title = %payload.title,
            subtitle = %payload.subtitle,
            body_len = payload.body.chars().count(),
            clipboard = attachment.map_or(false, |a| a.clipboard.is_some()),
            open_url = attachment.and_then(|a| a.open_url.as_deref()),
            media_url = attachment.and_then(|a| a.media_url.as_deref()),
            delay_ms = payload.delay_ms,
            "Notification"
        );
        Ok(())
    }
}

/// Notifier that keeps every payload it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    /// Posted payloads, oldest first
    pub posted: Arc<RwLock<Vec<NotificationPayload>>>,
}

impl RecordingNotifier {
    /// Create a new recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of posted payloads
    pub fn payloads(&self) -> Vec<NotificationPayload> {
        self.posted.read().clone()
    }

    /// Number of posted payloads
    pub fn count(&self) -> usize {
        self.posted.read().len()
    }

    /// Most recent payload
    pub fn last(&self) -> Option<NotificationPayload> {
        self.posted.read().last().cloned()
    }

    /// Forget all payloads
    pub fn clear(&self) {
        self.posted.write().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post(&self, payload: &NotificationPayload) -> Result<()> {
        self.posted.write().push(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();

        notifier
            .post(&NotificationPayload::new("a", "", "1"))
            .await
            .unwrap();
        notifier
            .post(&NotificationPayload::new("b", "", "2"))
            .await
            .unwrap();

        assert_eq!(handle.count(), 2);
        assert_eq!(handle.last().unwrap().title, "b");

        handle.clear();
        assert_eq!(notifier.count(), 0);
    }

    #[test]
    fn test_log_notifier() {
        let payload = NotificationPayload::new("t", "s", "b").with_delay(5.0);
        assert!(tokio_test::block_on(LogNotifier.post(&payload)).is_ok());
    }
}
