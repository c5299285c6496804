// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Traffic event types
//!
//! A [`TrafficEvent`] is one match delivered by the proxy host: the URL plus
//! the request side (for request scripts) and/or the response side (for
//! response scripts).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::http::Headers;

/// One matched exchange handed over by the proxy host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficEvent {
    /// Matched URL
    pub url: String,
    /// Request side, present for request scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestInfo>,
    /// Response side, present for response scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseInfo>,
}

/// Request information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,
    /// Request headers, in delivery order
    #[serde(default)]
    pub headers: Headers,
}

/// Response information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// Status code, when the host exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response body as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl TrafficEvent {
    /// Create a request-side event
    pub fn request(url: impl Into<String>, headers: Headers) -> Self {
        Self {
            url: url.into(),
            request: Some(RequestInfo::new("GET").with_headers(headers)),
            response: None,
        }
    }

    /// Create a response-side event
    pub fn response(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request: None,
            response: Some(ResponseInfo::new(200).with_body(body)),
        }
    }

    /// Response body, if this event has one
    pub fn response_body(&self) -> Option<&str> {
        self.response.as_ref()?.body.as_deref()
    }

    /// Load an event from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CaptureError::event(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl RequestInfo {
    /// Create request info for a method
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            headers: Headers::new(),
        }
    }

    /// Set headers
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

impl ResponseInfo {
    /// Create response info for a status
    pub fn new(status: u16) -> Self {
        Self {
            status: Some(status),
            body: None,
        }
    }

    /// Set body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Completion signal for the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Done {
    /// Body to forward unmodified, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Done {
    /// Complete without touching the exchange
    pub fn empty() -> Self {
        Self::default()
    }

    /// Complete forwarding `body`
    pub fn with_body(body: Option<&str>) -> Self {
        Self {
            body: body.map(String::from),
        }
    }
}

/// Host side of one script invocation
pub trait TrafficContext: Send {
    /// The matched exchange
    fn event(&self) -> &TrafficEvent;

    /// Raw argument string configured for the script
    fn argument(&self) -> &str;

    /// Signal completion; called exactly once per invocation
    fn done(&mut self, done: Done);
}

/// Owned context for replays and tests; records the completion it receives
#[derive(Debug, Clone, Default)]
pub struct ReplayContext {
    pub event: TrafficEvent,
    pub argument: String,
    /// Every completion received, in order
    pub completions: Vec<Done>,
}

impl ReplayContext {
    /// Create a context for an event and argument string
    pub fn new(event: TrafficEvent, argument: impl Into<String>) -> Self {
        Self {
            event,
            argument: argument.into(),
            completions: Vec::new(),
        }
    }
}

impl TrafficContext for ReplayContext {
    fn event(&self) -> &TrafficEvent {
        &self.event
    }

    fn argument(&self) -> &str {
        &self.argument
    }

    fn done(&mut self, done: Done) {
        self.completions.push(done);
    }
}
