// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP header handling for captured requests
//!
//! Provides an order-preserving header model and the cookie aggregation
//! used by the task-center capture.

mod cookie;
mod headers;

pub use cookie::{
    canonicalize, collect_segments, is_cookie_header, truncate_chars, Cookie, CookieMeta,
    CookieRecord, CookieSet,
};
pub use headers::{HeaderValue, Headers};

/// Common HTTP header names
pub mod names {
    pub const COOKIE: &str = "cookie";
    pub const USER_AGENT: &str = "user-agent";
}
