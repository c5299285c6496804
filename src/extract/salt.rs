// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Login response salt extraction
//!
//! The login payload is parsed as JSON first. Only when that fails (minified
//! fragments, wrapped or truncated bodies) are the fields scanned with
//! independent regexes. The two strategies never mix within one call.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level key carrying the salt; the dots are part of the key name
pub const SALT_FIELD: &str = "kuaishou.api_client_salt";

lazy_static! {
    static ref SALT_RE: Regex =
        Regex::new(r#""kuaishou\.api_client_salt"\s*:\s*"([^"]+)""#).unwrap();
    static ref USER_ID_RE: Regex = Regex::new(r#""user_id"\s*:\s*(\d+)"#).unwrap();
    static ref USER_NAME_RE: Regex = Regex::new(r#""user_name"\s*:\s*"([^"]*)""#).unwrap();
    static ref HEAD_URL_RE: Regex = Regex::new(r#""headurl"\s*:\s*"([^"]+)""#).unwrap();
}

/// Fields captured from one login response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltRecord {
    /// Rotating client salt
    pub salt: Option<String>,
    /// Numeric user id, as text
    pub user_id: Option<String>,
    /// Display name
    pub user_name: Option<String>,
    /// Avatar URL
    pub head_url: Option<String>,
}

/// Which strategy produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Body parsed as JSON
    Structured,
    /// Regex scan over the raw text
    Fallback,
}

impl SaltRecord {
    /// Salt value, if present and non-empty
    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether a usable salt was found
    pub fn has_salt(&self) -> bool {
        self.salt().is_some()
    }

    /// Whether any identity field was found
    pub fn has_user(&self) -> bool {
        non_empty(&self.user_id).is_some() || non_empty(&self.user_name).is_some()
    }

    /// Compact summary stored under the aggregated info key
    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&serde_json::json!({
            "api_client_salt": self.salt,
            "user_id": self.user_id,
            "user_name": self.user_name,
            "head_url": self.head_url,
        }))
    }
}

/// Extract salt and identity fields from a login response body.
///
/// Never fails; a body with nothing recognisable yields an all-`None` record.
pub fn extract(raw: &str) -> SaltRecord {
    extract_with_method(raw).0
}

/// Like [`extract`], also reporting which strategy was used
pub fn extract_with_method(raw: &str) -> (SaltRecord, ExtractionMethod) {
    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => (from_json(&parsed), ExtractionMethod::Structured),
        Err(_) => (from_text(raw), ExtractionMethod::Fallback),
    }
}

fn from_json(parsed: &Value) -> SaltRecord {
    let user = parsed.get("user");
    let user_field = |name: &str| user.and_then(|u| u.get(name)).and_then(scalar_text);

    SaltRecord {
        salt: parsed.get(SALT_FIELD).and_then(scalar_text),
        user_id: user_field("user_id"),
        user_name: user_field("user_name"),
        head_url: user_field("headurl"),
    }
}

fn from_text(raw: &str) -> SaltRecord {
    SaltRecord {
        salt: first_capture(&SALT_RE, raw),
        user_id: first_capture(&USER_ID_RE, raw),
        user_name: first_capture(&USER_NAME_RE, raw),
        head_url: first_capture(&HEAD_URL_RE, raw),
    }
}

fn first_capture(re: &Regex, raw: &str) -> Option<String> {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Text form of a JSON scalar; `null` counts as absent
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_extraction() {
        let body = r#"{"kuaishou.api_client_salt":"S1","user":{"user_id":42,"user_name":"Bob","headurl":"https://img.test/bob.jpg"}}"#;
        let (record, method) = extract_with_method(body);

        assert_eq!(method, ExtractionMethod::Structured);
        assert_eq!(record.salt(), Some("S1"));
        assert_eq!(record.user_id.as_deref(), Some("42"));
        assert_eq!(record.user_name.as_deref(), Some("Bob"));
        assert_eq!(record.head_url.as_deref(), Some("https://img.test/bob.jpg"));
    }

    #[test]
    fn test_structured_missing_fields_are_none() {
        let record = extract(r#"{"result":1,"user":{"user_name":null}}"#);
        assert_eq!(record, SaltRecord::default());

        let record = extract(r#"["not", "an", "object"]"#);
        assert_eq!(record, SaltRecord::default());
    }

    #[test]
    fn test_structured_wins_over_fallback() {
        // Valid JSON whose nested text would also match the fallback pattern
        let body = r#"{"kuaishou.api_client_salt":"X","raw":"\"kuaishou.api_client_salt\":\"Y\""}"#;
        let (record, method) = extract_with_method(body);

        assert_eq!(method, ExtractionMethod::Structured);
        assert_eq!(record.salt(), Some("X"));
    }

    #[test]
    fn test_fallback_on_malformed_body() {
        let body = r#"callback({"kuaishou.api_client_salt" : "abc123", "user": {"user_id": 7, "user_name": "", "headurl":"h.png"})"#;
        let (record, method) = extract_with_method(body);

        assert_eq!(method, ExtractionMethod::Fallback);
        assert_eq!(record.salt(), Some("abc123"));
        assert_eq!(record.user_id.as_deref(), Some("7"));
        assert_eq!(record.user_name.as_deref(), Some(""));
        assert_eq!(record.head_url.as_deref(), Some("h.png"));
        assert!(record.has_user());
    }

    #[test]
    fn test_fallback_fields_independent() {
        let record = extract(r#"truncated "user_name":"Ann", "kuaishou.api_client_salt":"#);

        assert_eq!(record.salt, None);
        assert_eq!(record.user_name.as_deref(), Some("Ann"));
        assert!(!record.has_salt());
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(extract(""), SaltRecord::default());
    }

    #[test]
    fn test_empty_salt_is_not_usable() {
        let record = extract(r#"{"kuaishou.api_client_salt":""}"#);
        assert_eq!(record.salt.as_deref(), Some(""));
        assert!(!record.has_salt());
    }

    #[test]
    fn test_summary_json() {
        let record = SaltRecord {
            salt: Some("S".into()),
            head_url: Some("h".into()),
            ..Default::default()
        };
        let summary: Value = serde_json::from_str(&record.summary_json().unwrap()).unwrap();

        assert_eq!(summary["api_client_salt"], "S");
        assert_eq!(summary["head_url"], "h");
        assert!(summary["user_id"].is_null());
    }
}
