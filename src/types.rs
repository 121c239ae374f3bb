//! Common types used throughout regional-users
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A single backend user. No schema is enforced; see [`crate::fields`].
pub type UserRecord = JsonValue;

/// Ordered list of query parameters
pub type QueryParams = Vec<(String, String)>;

/// Ordered list of request headers
pub type HeaderList = Vec<(String, String)>;

// ============================================================================
// Filters
// ============================================================================

/// Filter keys understood by the users endpoint
pub mod filter_keys {
    pub const STATUS: &str = "status";
    pub const PLATFORM_ADMIN: &str = "platform-admin";
    pub const EMAIL: &str = "email";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
}

/// Opaque filter set forwarded as query parameters.
///
/// Values are not interpreted; empty values are dropped when forwarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter value
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an optional filter value
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Insert a filter value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a filter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check whether no non-empty filters are set
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    /// Query parameters for the non-empty filters
    pub fn to_query(&self) -> QueryParams {
        self.0
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filters_skip_empty_values() {
        let filters = Filters::new()
            .with(filter_keys::STATUS, "active")
            .with(filter_keys::EMAIL, "")
            .with(filter_keys::FIRST_NAME, "  ")
            .with(filter_keys::PLATFORM_ADMIN, "false");

        assert_eq!(
            filters.to_query(),
            vec![
                ("platform-admin".to_string(), "false".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
        assert!(!filters.is_empty());
    }

    #[test]
    fn test_filters_empty() {
        assert!(Filters::new().is_empty());
        assert!(Filters::new().with("email", "").is_empty());
        assert!(Filters::new().with_opt("email", None::<String>).is_empty());
    }

    #[test]
    fn test_filters_deserialize_from_map() {
        let filters: Filters =
            serde_json::from_str(r#"{"status":"active","last_name":"Doe"}"#).unwrap();
        assert_eq!(filters.get("status"), Some("active"));
        assert_eq!(filters.get("last_name"), Some("Doe"));
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!("  ".to_string().none_if_empty(), None);
    }
}
