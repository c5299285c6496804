// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie header aggregation and canonicalization

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::headers::{HeaderValue, Headers};

/// A single `name=value` cookie pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Deduplicated cookie set in canonical order.
///
/// The first occurrence of a name fixes its position, the last occurrence
/// fixes its value. Bare tokens without `=` are kept as flags and rendered
/// after every pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet {
    cookies: Vec<Cookie>,
    index: HashMap<String, usize>,
    flags: Vec<String>,
}

impl CookieSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw header segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for segment in segments {
            set.add_segment(segment.as_ref());
        }
        set
    }

    /// Add one raw segment such as `a=1; b=2;; flag`
    pub fn add_segment(&mut self, segment: &str) {
        for piece in segment.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            match piece.find('=') {
                Some(idx) if idx > 0 => {
                    let (name, value) = (&piece[..idx], &piece[idx + 1..]);
                    self.set(name.trim(), value.trim());
                }
                _ => self.flags.push(piece.to_string()),
            }
        }
    }

    /// Set a cookie value, keeping the original position of an existing name
    pub fn set(&mut self, name: &str, value: &str) {
        match self.index.get(name) {
            Some(&pos) => self.cookies[pos].value = value.to_string(),
            None => {
                self.index.insert(name.to_string(), self.cookies.len());
                self.cookies.push(Cookie::new(name, value));
            }
        }
    }

    /// Get cookie value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&pos| self.cookies[pos].value.as_str())
    }

    /// Cookie pairs in canonical order
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Bare flag tokens in encounter order
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Total number of rendered items
    pub fn len(&self) -> usize {
        self.cookies.len() + self.flags.len()
    }

    /// Check if nothing usable was collected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for CookieSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .cookies
            .iter()
            .map(Cookie::to_header_value)
            .chain(self.flags.iter().cloned());

        for (i, item) in items.enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&item)?;
        }
        Ok(())
    }
}

/// Whether a header name belongs to the cookie family (`cookie`, `cookie#n`)
pub fn is_cookie_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == super::names::COOKIE || lower.starts_with("cookie#")
}

/// Collect the trimmed, non-empty values of every cookie-family header.
pub fn collect_segments(headers: &Headers) -> Vec<String> {
    let mut segments = Vec::new();
    for (name, value) in headers.iter() {
        if is_cookie_header(name) {
            push_segments(value, &mut segments);
        }
    }
    segments
}

fn push_segments(value: &HeaderValue, collector: &mut Vec<String>) {
    value.for_each_scalar(&mut |raw| {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            collector.push(trimmed.to_string());
        }
    });
}

/// Canonical cookie string for a list of raw segments.
///
/// Returns `""` when nothing usable remains. Idempotent: canonicalizing the
/// output again yields the same string.
pub fn canonicalize<S: AsRef<str>>(segments: &[S]) -> String {
    CookieSet::from_segments(segments).to_string()
}

/// Cookie capture from one task-center request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    /// Canonical cookie string
    pub cookie_string: String,
    /// User-Agent of the request, if any
    pub user_agent: Option<String>,
    /// Capture time
    pub updated_at: DateTime<Utc>,
    /// Request URL
    pub source_url: String,
}

/// Metadata blob stored next to the cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieMeta {
    pub cookie: String,
    pub user_agent: Option<String>,
    pub updated_at: String,
    pub url: String,
}

impl CookieRecord {
    /// Create a record stamped with the current time
    pub fn new(
        cookie_string: impl Into<String>,
        user_agent: Option<&str>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            cookie_string: cookie_string.into(),
            user_agent: user_agent.filter(|ua| !ua.is_empty()).map(String::from),
            updated_at: Utc::now(),
            source_url: source_url.into(),
        }
    }

    /// Build a record from request headers.
    ///
    /// Returns `None` when the headers carry no usable cookie data.
    pub fn from_headers(headers: &Headers, source_url: impl Into<String>) -> Option<Self> {
        let cookie_string = canonicalize(&collect_segments(headers));
        if cookie_string.is_empty() {
            return None;
        }
        Some(Self::new(
            cookie_string,
            headers.get(super::names::USER_AGENT),
            source_url,
        ))
    }

    /// Display preview, cut after `max_chars` characters with an ellipsis
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.cookie_string, max_chars)
    }

    /// Clipboard text: bare cookie, or cookie plus user agent on two lines
    pub fn clipboard_text(&self) -> String {
        match self.user_agent.as_deref() {
            Some(ua) => format!("Cookie: {}\nUser-Agent: {}", self.cookie_string, ua),
            None => self.cookie_string.clone(),
        }
    }

    /// Metadata blob for the `_META` store slot
    pub fn meta(&self) -> CookieMeta {
        CookieMeta {
            cookie: self.cookie_string.clone(),
            user_agent: self.user_agent.clone(),
            updated_at: self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            url: self.source_url.clone(),
        }
    }
}

/// Cut a string after `max_chars` characters, appending `…` when cut
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
