//! Dot-separated JSON key paths
//!
//! Supports basic paths like `"$.data.items"` or `"data.items"`. Lookups walk
//! objects only and report a missing segment as `None`.

use serde_json::Value;
use std::fmt;

/// A parsed dot path into a JSON document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    /// Parse a dot path. An empty path (or `$`) refers to the root value.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path
            .strip_prefix("$.")
            .or_else(|| path.strip_prefix('$'))
            .unwrap_or(path);

        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Check whether this path refers to the root value
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walk the path, returning the value it points at
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for segment in &self.segments {
            match current {
                Value::Object(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Walk the path and render a scalar as a string.
    ///
    /// Null, `false`, empty strings, arrays and objects yield `None`.
    pub fn lookup_token(&self, value: &Value) -> Option<String> {
        match self.lookup(value)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

impl From<&str> for JsonPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("$")
        } else {
            f.write_str(&self.segments.join("."))
        }
    }
}
