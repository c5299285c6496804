// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Script argument parsing and option resolution

mod args;
mod options;

pub use args::CaptureConfig;
pub use options::{aliases, CookieOptions, NotifyOptions, SaltOptions, DEFAULT_COOKIE_STORE_KEY};
