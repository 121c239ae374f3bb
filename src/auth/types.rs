//! Auth configuration types

use crate::error::{Error, Result};
use crate::types::HeaderList;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header used by the api-key mode unless configured otherwise
pub const DEFAULT_API_KEY_HEADER: &str = "X-Api-Key";

/// How the API key is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `<header_name>: <key>`
    #[default]
    #[serde(alias = "x-api-key")]
    ApiKey,
}

impl FromStr for HeaderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(Self::Bearer),
            "api_key" | "api-key" | "x-api-key" => Ok(Self::ApiKey),
            other => Err(Error::config(format!("Unsupported HEADER_MODE: {other}"))),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Header mode
    pub header_mode: HeaderMode,
    /// Header name for the api-key mode
    pub header_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_mode: HeaderMode::ApiKey,
            header_name: DEFAULT_API_KEY_HEADER.to_string(),
        }
    }
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer() -> Self {
        Self {
            header_mode: HeaderMode::Bearer,
            ..Default::default()
        }
    }

    /// API key in a named header
    pub fn api_key(header_name: impl Into<String>) -> Self {
        Self {
            header_mode: HeaderMode::ApiKey,
            header_name: header_name.into(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.header_mode == HeaderMode::ApiKey && self.header_name.trim().is_empty() {
            return Err(Error::invalid_value("header_name", "cannot be empty"));
        }
        Ok(())
    }

    /// Headers carrying `api_key`. Exactly one auth header is produced.
    pub fn headers(&self, api_key: &str) -> HeaderList {
        let api_key = api_key.trim();
        match self.header_mode {
            HeaderMode::Bearer => vec![("Authorization".to_string(), format!("Bearer {api_key}"))],
            HeaderMode::ApiKey => vec![(self.header_name.clone(), api_key.to_string())],
        }
    }
}

/// Mask all but the last four characters of a key, for logs
pub fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("***{tail}")
}
