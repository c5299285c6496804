// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Notification payload types

use serde::{Deserialize, Serialize};

/// Optional actions attached to a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Text copied to the clipboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<String>,
    /// URL opened when the notification is tapped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<String>,
    /// Image shown with the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl Attachment {
    /// Check if no action is set
    pub fn is_empty(&self) -> bool {
        self.clipboard.is_none() && self.open_url.is_none() && self.media_url.is_none()
    }

    /// `None` for an empty attachment, so hosts never receive `{}`
    pub fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// A notification ready for the host's notification facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Display delay in milliseconds, fractions kept; never negative
    pub delay_ms: f64,
}

impl NotificationPayload {
    /// Create a payload without attachment or delay
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            body: body.into(),
            attachment: None,
            delay_ms: 0.0,
        }
    }

    /// Attach actions; an empty attachment is dropped
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = attachment.into_option();
        self
    }

    /// Set display delay, clamping non-positive or non-finite values to zero
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = if delay_ms.is_finite() && delay_ms > 0.0 {
            delay_ms
        } else {
            0.0
        };
        self
    }

    /// Clipboard text, if attached
    pub fn clipboard(&self) -> Option<&str> {
        self.attachment.as_ref()?.clipboard.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_attachment_dropped() {
        let payload = NotificationPayload::new("t", "s", "b").with_attachment(Attachment::default());
        assert!(payload.attachment.is_none());

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("attachment").is_none());
    }

    #[test]
    fn test_partial_attachment_serialization() {
        let payload = NotificationPayload::new("t", "s", "b").with_attachment(Attachment {
            open_url: Some("ksnebula://".into()),
            ..Default::default()
        });

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["attachment"], serde_json::json!({ "openUrl": "ksnebula://" }));
        assert_eq!(json["delayMs"], 0.0);
    }

    #[test]
    fn test_delay_clamp() {
        assert_eq!(NotificationPayload::new("", "", "").with_delay(-3.0).delay_ms, 0.0);
        assert_eq!(NotificationPayload::new("", "", "").with_delay(f64::NAN).delay_ms, 0.0);
        assert_eq!(NotificationPayload::new("", "", "").with_delay(f64::INFINITY).delay_ms, 0.0);
    }

    #[test]
    fn test_fractional_delay_kept() {
        let payload = NotificationPayload::new("", "", "").with_delay(1500.9);
        assert_eq!(payload.delay_ms, 1500.9);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["delayMs"], 1500.9);
    }
}
