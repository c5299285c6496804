// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header maps as delivered by proxy hosts
//!
//! Hosts hand scripts a plain object: names keep their original case, a name
//! may be repeated with a `#n` suffix, and a value may be a string or a list.
//! Document order is preserved because cookie canonicalization depends on it.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A header value: one string or a (possibly nested) list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Single value
    Single(String),
    /// Repeated header delivered as a list
    Multi(Vec<HeaderValue>),
}

impl HeaderValue {
    /// Convert a JSON value delivered by the host.
    ///
    /// Numbers and booleans are stringified; `null` and objects carry no
    /// header text and yield `None`, also inside lists.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(HeaderValue::Single(s.clone())),
            Value::Number(n) => Some(HeaderValue::Single(n.to_string())),
            Value::Bool(b) => Some(HeaderValue::Single(b.to_string())),
            Value::Array(items) => Some(HeaderValue::Multi(
                items.iter().filter_map(HeaderValue::from_json).collect(),
            )),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// First scalar value, depth first
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(s) => Some(s),
            HeaderValue::Multi(values) => values.first().and_then(HeaderValue::first),
        }
    }

    /// Visit every scalar value in order
    pub fn for_each_scalar<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            HeaderValue::Single(s) => f(s),
            HeaderValue::Multi(values) => {
                for value in values {
                    value.for_each_scalar(f);
                }
            }
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Single(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Single(s)
    }
}

impl<T: Into<HeaderValue>> From<Vec<T>> for HeaderValue {
    fn from(values: Vec<T>) -> Self {
        HeaderValue::Multi(values.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for HeaderValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        HeaderValue::from_json(&value)
            .ok_or_else(|| de::Error::custom("header value must be a scalar or a list"))
    }
}

/// Ordered header map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, HeaderValue)>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header (builder style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a header, replacing an entry with the exact same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Case-insensitive lookup of the first scalar value for a header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.first())
    }

    /// Number of header entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of header names to strings or lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Headers, A::Error> {
                let mut headers = Headers::new();
                // null and object values are dropped, as hosts do
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    if let Some(value) = HeaderValue::from_json(&value) {
                        headers.insert(name, value);
                    }
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}
