// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resolved capture options
//!
//! Each capture path reads its own prefixed aliases first, then the shared
//! short names, so one argument string can configure both paths.

use super::args::CaptureConfig;

/// Default store key for the task-center cookie
pub const DEFAULT_COOKIE_STORE_KEY: &str = "KS_EARN_COOKIE";

/// Alias lists, highest priority first
pub mod aliases {
    pub const SALT_NOTIFY: &[&str] = &["salt_notify", "salt.notification", "notify"];
    pub const SALT_NOTIFY_ALWAYS: &[&str] = &["salt_notifyAlways", "notifyAlways"];
    pub const SALT_CLIPBOARD: &[&str] = &["salt_clipboard", "clipboard"];
    pub const SALT_SAVE_USER_INFO: &[&str] = &["salt_saveUserInfo", "saveUserInfo"];
    pub const SALT_OPEN_URL: &[&str] = &["salt_openUrl", "openUrl"];
    pub const SALT_MEDIA_URL: &[&str] = &["salt_mediaUrl", "mediaUrl"];
    pub const SALT_DELAY: &[&str] = &["salt_delayMs", "salt_delay", "delayMs", "delay"];

    pub const COOKIE_STORE_KEY: &[&str] = &["cookie_storeKey", "storeKey"];
    pub const COOKIE_NOTIFY: &[&str] = &["cookie_notify", "notify"];
    pub const COOKIE_NOTIFY_ALWAYS: &[&str] = &["cookie_notifyAlways", "notifyAlways"];
    pub const COOKIE_CLIPBOARD: &[&str] = &["cookie_clipboard", "clipboard"];
    pub const COOKIE_OPEN_URL: &[&str] = &["cookie_openUrl", "openUrl"];
    pub const COOKIE_MEDIA_URL: &[&str] = &["cookie_mediaUrl", "mediaUrl"];
    pub const COOKIE_DELAY: &[&str] = &["cookie_delayMs", "cookie_delay", "delayMs", "delay"];
}

/// Notification behaviour shared by both capture paths
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyOptions {
    /// Post notifications at all
    pub enabled: bool,
    /// Also notify when the captured value did not change
    pub notify_unchanged: bool,
    /// Attach clipboard content
    pub clipboard: bool,
    /// URL opened when the notification is tapped
    pub open_url: Option<String>,
    /// Image shown with the notification
    pub media_url: Option<String>,
    /// Display delay in milliseconds
    pub delay_ms: f64,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            notify_unchanged: false,
            clipboard: true,
            open_url: None,
            media_url: None,
            delay_ms: 0.0,
        }
    }
}

impl NotifyOptions {
    /// Create default notify options
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable notifications
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Notify on every hit, not just on change
    pub fn notify_unchanged(mut self, always: bool) -> Self {
        self.notify_unchanged = always;
        self
    }

    /// Enable/disable clipboard attachment
    pub fn clipboard(mut self, clipboard: bool) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Set open URL
    pub fn open_url(mut self, url: impl Into<String>) -> Self {
        self.open_url = Some(url.into());
        self
    }

    /// Set media URL
    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    /// Set delay
    pub fn delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Silent preset, used when only persistence is wanted
    pub fn silent() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Options for the login salt capture
#[derive(Debug, Clone, PartialEq)]
pub struct SaltOptions {
    /// Persist user id, name and avatar alongside the salt
    pub save_user_info: bool,
    /// Notification behaviour
    pub notify: NotifyOptions,
}

impl Default for SaltOptions {
    fn default() -> Self {
        Self {
            save_user_info: true,
            notify: NotifyOptions::default(),
        }
    }
}

impl SaltOptions {
    /// Resolve salt options from a host argument string
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self {
            save_user_info: config.read_bool(aliases::SALT_SAVE_USER_INFO, true),
            notify: NotifyOptions {
                enabled: config.read_bool(aliases::SALT_NOTIFY, true),
                notify_unchanged: config.read_bool(aliases::SALT_NOTIFY_ALWAYS, false),
                clipboard: config.read_bool(aliases::SALT_CLIPBOARD, true),
                open_url: config.read_opt_string(aliases::SALT_OPEN_URL),
                media_url: config.read_opt_string(aliases::SALT_MEDIA_URL),
                delay_ms: config.read_delay(aliases::SALT_DELAY),
            },
        }
    }
}

/// Options for the task-center cookie capture
#[derive(Debug, Clone, PartialEq)]
pub struct CookieOptions {
    /// Primary store key; `_UA` and `_META` slots are derived from it
    pub store_key: String,
    /// Notification behaviour
    pub notify: NotifyOptions,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_COOKIE_STORE_KEY.to_string(),
            notify: NotifyOptions::default(),
        }
    }
}

impl CookieOptions {
    /// Resolve cookie options from a host argument string
    pub fn from_config(config: &CaptureConfig) -> Self {
        // A blank storeKey would collide with the derived slots
        let store_key = Some(config.read_string(aliases::COOKIE_STORE_KEY, DEFAULT_COOKIE_STORE_KEY))
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_STORE_KEY.to_string());

        Self {
            store_key,
            notify: NotifyOptions {
                enabled: config.read_bool(aliases::COOKIE_NOTIFY, true),
                notify_unchanged: config.read_bool(aliases::COOKIE_NOTIFY_ALWAYS, false),
                clipboard: config.read_bool(aliases::COOKIE_CLIPBOARD, true),
                open_url: config.read_opt_string(aliases::COOKIE_OPEN_URL),
                media_url: config.read_opt_string(aliases::COOKIE_MEDIA_URL),
                delay_ms: config.read_delay(aliases::COOKIE_DELAY),
            },
        }
    }

    /// Store key for the user agent slot
    pub fn user_agent_key(&self) -> String {
        format!("{}_UA", self.store_key)
    }

    /// Store key for the metadata slot
    pub fn meta_key(&self) -> String {
        format!("{}_META", self.store_key)
    }
}
