// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL-based routing of traffic events to a capture path

use std::fmt;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use super::event::TrafficEvent;
use crate::error::Result;
use crate::http::Headers;

/// Login endpoint whose response carries the salt
pub const LOGIN_PATTERN: &str = r"https?://api3\.ksapisrv\.com/rest/nebula/user/login";

/// Task-center endpoint whose request carries the cookie
pub const TASKS_PATTERN: &str =
    r"https?://nebula\.kuaishou\.com/rest/n/nebula/activity/earn/overview/tasks";

lazy_static! {
    static ref DEFAULT: Dispatcher = Dispatcher {
        salt: case_insensitive(LOGIN_PATTERN).unwrap(),
        cookie: case_insensitive(TASKS_PATTERN).unwrap(),
    };
}

/// Capture path selected for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    /// Login salt from a response body
    Salt,
    /// Cookie from request headers
    Cookie,
    /// Neither rule matched
    Unknown,
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaptureKind::Salt => "salt",
            CaptureKind::Cookie => "cookie",
            CaptureKind::Unknown => "unknown",
        })
    }
}

/// Classification result with the part of the event the path consumes
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    /// Response body of the login endpoint
    Salt { body: &'a str },
    /// Request headers of the task-center endpoint
    Cookie { headers: &'a Headers },
    /// Unmatched; any response body must be forwarded untouched
    Unknown { body: Option<&'a str> },
}

impl Route<'_> {
    /// Capture kind of this route
    pub fn kind(&self) -> CaptureKind {
        match self {
            Route::Salt { .. } => CaptureKind::Salt,
            Route::Cookie { .. } => CaptureKind::Cookie,
            Route::Unknown { .. } => CaptureKind::Unknown,
        }
    }
}

/// Two-rule URL classifier
#[derive(Debug, Clone)]
pub struct Dispatcher {
    salt: Regex,
    cookie: Regex,
}

impl Default for Dispatcher {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

impl Dispatcher {
    /// Dispatcher for the built-in endpoints
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with custom URL patterns (matched case-insensitively)
    pub fn with_patterns(salt: &str, cookie: &str) -> Result<Self> {
        Ok(Self {
            salt: case_insensitive(salt)?,
            cookie: case_insensitive(cookie)?,
        })
    }

    /// Classify an event.
    ///
    /// The salt rule needs a response, the cookie rule a request; the salt
    /// rule is tried first.
    pub fn classify<'a>(&self, event: &'a TrafficEvent) -> Route<'a> {
        if let Some(response) = &event.response {
            if self.salt.is_match(&event.url) {
                return Route::Salt {
                    body: response.body.as_deref().unwrap_or(""),
                };
            }
        }

        if let Some(request) = &event.request {
            if self.cookie.is_match(&event.url) {
                return Route::Cookie {
                    headers: &request.headers,
                };
            }
        }

        Route::Unknown {
            body: event.response_body(),
        }
    }
}

fn case_insensitive(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
