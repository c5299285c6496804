// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the capture pipeline
//!
//! Malformed payloads and missing fields are not errors: they are recovered
//! inside the extractor or reported as informational notifications. This
//! type covers the unexpected failures that the pipeline's top-level handler
//! turns into an exception notification.

use std::error::Error as StdError;

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Main error type for the capture pipeline
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Key-value store read or write failed
    #[error("Store error on key '{key}': {reason}")]
    Store { key: String, reason: String },

    /// Notification facility rejected a payload
    #[error("Notification error: {0}")]
    Notify(String),

    /// Traffic event is unusable (e.g. cannot be loaded)
    #[error("Invalid traffic event: {0}")]
    Event(String),

    /// URL pattern failed to compile
    #[error("Invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl CaptureError {
    /// Create a store error for a key
    pub fn store(key: impl Into<String>, reason: impl Into<String>) -> Self {
        CaptureError::Store {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a notification error
    pub fn notify<S: Into<String>>(msg: S) -> Self {
        CaptureError::Notify(msg.into())
    }

    /// Create an event error
    pub fn event<S: Into<String>>(msg: S) -> Self {
        CaptureError::Event(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CaptureError::Other(msg.into())
    }

    /// Check if this is a store error
    pub fn is_store(&self) -> bool {
        matches!(self, CaptureError::Store { .. } | CaptureError::Io(_))
    }

    /// Store key involved in the failure, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            CaptureError::Store { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Render the error with its full source chain, one cause per line.
    ///
    /// Used as the body of the exception notification.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = StdError::source(self);
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = StdError::source(cause);
        }
        out
    }
}

impl From<String> for CaptureError {
    fn from(s: String) -> Self {
        CaptureError::Other(s)
    }
}

impl From<&str> for CaptureError {
    fn from(s: &str) -> Self {
        CaptureError::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attribute a failure to a store key
    fn with_key(self, key: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<CaptureError>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_key(self, key: &str) -> Result<T> {
        self.map_err(|e| {
            let err: CaptureError = e.into();
            match err {
                CaptureError::Store { reason, .. } => CaptureError::store(key, reason),
                other => CaptureError::store(key, other.to_string()),
            }
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err: CaptureError = e.into();
            CaptureError::Other(format!("{}: {}", msg, err))
        })
    }
}
