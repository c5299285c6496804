// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Notification composition
//!
//! Turns a capture result into at most one notification. Unchanged values
//! stay silent unless the caller asked to be told about every hit.

use super::payload::{Attachment, NotificationPayload};
use crate::config::NotifyOptions;
use crate::error::CaptureError;
use crate::extract::SaltRecord;
use crate::http::CookieRecord;
use crate::store::WriteOutcome;

/// Characters of the cookie shown in the notification body
pub const COOKIE_PREVIEW_CHARS: usize = 96;

/// Placeholder for absent identity fields
const PLACEHOLDER: &str = "-";

pub mod text {
    pub const SALT_TITLE: &str = "快手 salt 获取成功";
    pub const SALT_NO_USER: &str = "用户信息缺失";
    pub const SALT_MISSING_TITLE: &str = "未找到 api_client_salt";
    pub const SALT_MISSING_BODY: &str = "请确认已启用 MITM 与证书，且触发登录接口";

    pub const COOKIE_TITLE: &str = "快手极速版 Cookie 已更新";
    pub const COOKIE_SUBTITLE: &str = "任务中心请求已捕获";
    pub const COOKIE_MISSING_TITLE: &str = "快手极速版 Cookie 获取失败";
    pub const COOKIE_NO_HEADER: &str = "请求中未找到 Cookie 字段";
    pub const COOKIE_EMPTY: &str = "Cookie 字段内容为空";

    pub const EXCEPTION_TITLE: &str = "快手合集脚本异常";
}

/// Why a capture produced nothing usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    /// Login response had no salt
    SaltField,
    /// Request carried no cookie header at all
    CookieHeader,
    /// Cookie headers were present but empty
    EmptyCookie,
}

/// What a capture path observed for one event
#[derive(Debug, Clone, Copy)]
pub enum Observation<'a> {
    /// Salt captured and written
    Salt {
        record: &'a SaltRecord,
        write: &'a WriteOutcome,
    },
    /// Cookie captured and written
    Cookie {
        record: &'a CookieRecord,
        write: &'a WriteOutcome,
    },
    /// Nothing usable was found
    Missing(MissingData),
}

/// Build the notification for an observation, or `None` to stay silent.
pub fn compose(observation: Observation<'_>, options: &NotifyOptions) -> Option<NotificationPayload> {
    if !options.enabled {
        return None;
    }

    match observation {
        Observation::Missing(missing) => Some(missing_payload(missing)),
        Observation::Salt { record, write } => {
            if !should_announce(write, options) {
                return None;
            }
            salt_payload(record, options)
        }
        Observation::Cookie { record, write } => {
            if !should_announce(write, options) {
                return None;
            }
            Some(cookie_payload(record, options))
        }
    }
}

/// Generic notification for an unexpected pipeline failure
pub fn exception(error: &CaptureError) -> NotificationPayload {
    NotificationPayload::new(text::EXCEPTION_TITLE, "", error.report())
}

fn should_announce(write: &WriteOutcome, options: &NotifyOptions) -> bool {
    write.changed || options.notify_unchanged
}

fn missing_payload(missing: MissingData) -> NotificationPayload {
    match missing {
        MissingData::SaltField => {
            NotificationPayload::new(text::SALT_MISSING_TITLE, "", text::SALT_MISSING_BODY)
        }
        MissingData::CookieHeader => {
            NotificationPayload::new(text::COOKIE_MISSING_TITLE, "", text::COOKIE_NO_HEADER)
        }
        MissingData::EmptyCookie => {
            NotificationPayload::new(text::COOKIE_MISSING_TITLE, "", text::COOKIE_EMPTY)
        }
    }
}

fn salt_payload(record: &SaltRecord, options: &NotifyOptions) -> Option<NotificationPayload> {
    let salt = record.salt()?;

    let subtitle = if record.has_user() {
        format!(
            "用户: {} ({})",
            or_placeholder(&record.user_name),
            or_placeholder(&record.user_id)
        )
    } else {
        text::SALT_NO_USER.to_string()
    };
    let content = format!("api_client_salt={}", salt);

    let attachment = Attachment {
        clipboard: options.clipboard.then(|| content.clone()),
        open_url: options.open_url.clone(),
        media_url: options
            .media_url
            .clone()
            .or_else(|| record.head_url.clone().filter(|url| !url.is_empty())),
    };

    Some(
        NotificationPayload::new(text::SALT_TITLE, subtitle, content)
            .with_attachment(attachment)
            .with_delay(options.delay_ms),
    )
}

fn cookie_payload(record: &CookieRecord, options: &NotifyOptions) -> NotificationPayload {
    let attachment = Attachment {
        clipboard: options.clipboard.then(|| record.clipboard_text()),
        open_url: options.open_url.clone(),
        media_url: options.media_url.clone(),
    };

    NotificationPayload::new(
        text::COOKIE_TITLE,
        text::COOKIE_SUBTITLE,
        record.preview(COOKIE_PREVIEW_CHARS),
    )
    .with_attachment(attachment)
    .with_delay(options.delay_ms)
}

fn or_placeholder(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(PLACEHOLDER)
}
