// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Traffic events delivered by the proxy host and their classification

mod dispatcher;
mod event;

pub use dispatcher::{CaptureKind, Dispatcher, Route, LOGIN_PATTERN, TASKS_PATTERN};
pub use event::{Done, ReplayContext, RequestInfo, ResponseInfo, TrafficContext, TrafficEvent};
