// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host argument string parsing
//!
//! Proxy hosts hand scripts a single `key=value&key=value` string. Options are
//! looked up through alias lists so a prefixed key (`salt_notify`) can
//! override a shared short key (`notify`).

use std::collections::HashMap;

/// Values accepted as "on"
const TRUTHY: &[&str] = &["on", "true", "1", "yes"];

/// Values accepted as "off"
const FALSY: &[&str] = &["off", "false", "0", "no"];

/// Decoded option map from a host argument string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureConfig {
    values: HashMap<String, String>,
}

impl CaptureConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `key=value&key=value` argument string.
    ///
    /// Never fails: segments without `=` become keys with an empty value, and
    /// malformed percent escapes are kept as written.
    pub fn parse(raw: &str) -> Self {
        let mut values = HashMap::new();

        for segment in raw.split('&') {
            if segment.is_empty() {
                continue;
            }

            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key, value),
                None => (segment, ""),
            };

            values.insert(key.trim().to_string(), decode_component(value));
        }

        Self { values }
    }

    /// Set a value (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether a key is present (even with an empty value)
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no options were given
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over options in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Read a string option.
    ///
    /// The first alias present decides: a non-blank value is returned trimmed,
    /// a blank one yields `""`. Only when no alias is present does `default`
    /// apply.
    pub fn read_string(&self, aliases: &[&str], default: &str) -> String {
        aliases
            .iter()
            .find_map(|alias| self.get(alias))
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// Like [`read_string`](Self::read_string) with no default, mapping blank to `None`
    pub fn read_opt_string(&self, aliases: &[&str]) -> Option<String> {
        Some(self.read_string(aliases, "")).filter(|value| !value.is_empty())
    }

    /// Read an on/off option.
    ///
    /// Aliases whose value is not a recognised switch word are skipped.
    pub fn read_bool(&self, aliases: &[&str], default: bool) -> bool {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find_map(parse_switch)
            .unwrap_or(default)
    }

    /// Read a delay in milliseconds.
    ///
    /// The first alias holding a finite, non-negative number wins; anything
    /// else is skipped. Returns `0.0` when no alias qualifies.
    pub fn read_delay(&self, aliases: &[&str]) -> f64 {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find_map(parse_delay)
            .unwrap_or(0.0)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CaptureConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Percent-decode an argument value without ever failing
fn decode_component(value: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
}

fn parse_switch(value: &str) -> Option<bool> {
    let value = value.trim().to_ascii_lowercase();
    if TRUTHY.contains(&value.as_str()) {
        Some(true)
    } else if FALSY.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn parse_delay(value: &str) -> Option<f64> {
    let value = value.trim();
    // Blank coerces to zero, as host number coercion does
    let num = if value.is_empty() {
        0.0
    } else {
        parse_radix_literal(value).or_else(|| value.parse::<f64>().ok())?
    };
    (num.is_finite() && num >= 0.0).then_some(num)
}

/// Unsigned `0x` / `0o` / `0b` integer literals, accepted by host number coercion
fn parse_radix_literal(value: &str) -> Option<f64> {
    let prefix = value.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    u64::from_str_radix(&value[2..], radix).ok().map(|n| n as f64)
}
