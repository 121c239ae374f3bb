//! Error types for regional-users
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// The main error type for regional-users
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Invalid API key or insufficient permissions (HTTP {status})")]
    Auth { status: u16, body: String },

    #[error("API key is required")]
    MissingApiKey,

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Region Errors
    // ============================================================================
    #[error("Region '{region}': {source}")]
    Region {
        region: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Unknown region: {region}")]
    UnknownRegion { region: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an auth error
    pub fn auth(status: u16, body: impl Into<String>) -> Self {
        Self::Auth {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Attach a region code to an error
    pub fn in_region(self, region: impl Into<String>) -> Self {
        Self::Region {
            region: region.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping region wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Region { source, .. } => source.root(),
            other => other,
        }
    }

    /// Region the error was raised for, if any
    pub fn region(&self) -> Option<&str> {
        match self {
            Error::Region { region, .. } => Some(region),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Error::Http(e) => !e.is_builder() && !e.is_decode() && !e.is_redirect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self.root(),
            Error::Config { .. } | Error::InvalidConfigValue { .. } | Error::YamlParse(_)
        )
    }

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self.root(), Error::Auth { .. } | Error::MissingApiKey)
    }

    /// HTTP status observed for this error, if any
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Error::Auth { status, .. } | Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Error payload returned by the backend, parsed as JSON when possible
    pub fn details(&self) -> Value {
        match self.root() {
            Error::Auth { body, .. } | Error::HttpStatus { body, .. } => parse_body(body),
            other => json!({ "message": other.to_string() }),
        }
    }

    /// Process exit code for CLI callers
    pub fn exit_code(&self) -> i32 {
        if self.is_auth() {
            1
        } else if self.is_config() {
            3
        } else {
            2
        }
    }

    /// Structured failure for callers that render their own messages
    pub fn to_failure(&self) -> FetchFailure {
        let status = match self.root() {
            Error::UnknownRegion { .. } | Error::MissingApiKey => 400,
            _ if self.is_config() => 500,
            _ => self.status().unwrap_or(502),
        };

        FetchFailure {
            status,
            message: self.root().to_string(),
            details: self.details(),
            region: self.region().map(str::to_string),
        }
    }
}

/// Structured failure surfaced at the top-level fetch boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    /// HTTP status (backend status when one was observed)
    pub status: u16,
    /// Short description of the failure
    pub message: String,
    /// Parsed error body, or `{"message": ...}`
    pub details: Value,
    /// Offending region code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "message": body }))
}

/// Result type alias for regional-users
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_value("page_size", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be positive"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::http_status(500, "boom").in_region("eu");
        assert_eq!(err.to_string(), "Region 'eu': HTTP 500: boom");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());
        assert!(Error::http_status(599, "").is_retryable());
        assert!(Error::http_status(502, "").in_region("us").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::auth(401, "").is_retryable());
        assert!(!Error::malformed("not json").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::auth(403, "").exit_code(), 1);
        assert_eq!(Error::auth(401, "").in_region("ap").exit_code(), 1);
        assert_eq!(Error::MissingApiKey.exit_code(), 1);
        assert_eq!(Error::config("bad").exit_code(), 3);
        assert_eq!(Error::http_status(500, "").exit_code(), 2);
        assert_eq!(Error::malformed("x").exit_code(), 2);
    }

    #[test]
    fn test_details_parses_json_body() {
        let err = Error::http_status(500, r#"{"code":"E1","message":"down"}"#);
        assert_eq!(err.details(), json!({"code": "E1", "message": "down"}));

        let err = Error::http_status(502, "bad gateway");
        assert_eq!(err.details(), json!({"message": "bad gateway"}));
    }

    #[test]
    fn test_to_failure() {
        let failure = Error::http_status(503, r#"{"message":"maintenance"}"#)
            .in_region("ca")
            .to_failure();
        assert_eq!(failure.status, 503);
        assert_eq!(failure.region.as_deref(), Some("ca"));
        assert_eq!(failure.details["message"], "maintenance");

        let failure = Error::UnknownRegion {
            region: "zz".to_string(),
        }
        .to_failure();
        assert_eq!(failure.status, 400);
        assert!(failure.region.is_none());

        let failure = Error::malformed("expected array").to_failure();
        assert_eq!(failure.status, 502);
    }
}
