// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Notification composition and delivery

mod composer;
mod notifier;
mod payload;

pub use composer::{compose, exception, text, MissingData, Observation, COOKIE_PREVIEW_CHARS};
pub use notifier::{LogNotifier, Notifier, RecordingNotifier};
pub use payload::{Attachment, NotificationPayload};
