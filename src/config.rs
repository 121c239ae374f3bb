//! Application configuration
//!
//! Configuration is read once at startup: an optional YAML file, then
//! environment variable overrides, then validation. The result is immutable
//! for the lifetime of the process.
//!
//! ```yaml
//! base_url: "https://{region}.api.example.com/account"
//! users_by_region_path: /api/1/users
//! auth:
//!   header_mode: api_key
//!   header_name: X-Api-Key
//! regions:
//!   - code: us
//!     name: US (United States)
//! pagination:
//!   strategy: offset
//!   page_size: 200
//! retry:
//!   max_retries: 3
//! ```

use crate::aggregate::{Aggregator, FetchMode};
use crate::auth::AuthConfig;
use crate::engine::PageEngine;
use crate::error::{Error, Result};
use crate::http::{ApiClient, HttpClientConfig};
use crate::pagination::PaginationConfig;
use crate::region::{EndpointConfig, RegionCatalog, RegionFetcher};
use crate::retry::{Retrier, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Environment Variables
// ============================================================================

/// Environment variables that override file values
pub mod env_vars {
    pub const BASE_URL: &str = "BASE_URL";
    pub const ALL_USERS_PATH: &str = "ALL_USERS_PATH";
    pub const USERS_BY_REGION_PATH: &str = "USERS_BY_REGION_PATH";
    pub const HEADER_MODE: &str = "HEADER_MODE";
    pub const HEADER_NAME: &str = "HEADER_NAME";
    pub const REGIONS: &str = "REGIONS";
    pub const PAGINATION_STRATEGY: &str = "PAGINATION_STRATEGY";
    pub const CURSOR_PARAM: &str = "CURSOR_PARAM";
    pub const NEXT_CURSOR_PATH: &str = "NEXT_CURSOR_PATH";
    pub const LIMIT_PARAM: &str = "LIMIT_PARAM";
    pub const OFFSET_PARAM: &str = "OFFSET_PARAM";
    pub const PAGE_SIZE: &str = "PAGE_SIZE";
    pub const ITEMS_PATH: &str = "ITEMS_PATH";
    pub const MODE: &str = "MODE";
    pub const MAX_RETRIES: &str = "MAX_RETRIES";
    pub const INITIAL_BACKOFF_MS: &str = "INITIAL_BACKOFF_MS";
    pub const BACKOFF_FACTOR: &str = "BACKOFF_FACTOR";
    pub const HTTP_TIMEOUT_SECONDS: &str = "HTTP_TIMEOUT_SECONDS";
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL template and endpoint paths
    #[serde(flatten)]
    pub endpoints: EndpointConfig,

    /// How the API key is sent
    pub auth: AuthConfig,

    /// Ordered region catalog
    pub regions: RegionCatalog,

    /// Pagination strategy and parameter names
    pub pagination: PaginationConfig,

    /// Per-region fan-out or single endpoint
    pub mode: FetchMode,

    /// Retry settings
    pub retry: RetryConfig,

    /// HTTP transport settings
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load configuration: file (if any), environment overrides, validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML config file without applying overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded config file {}", path.display());
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration without applying overrides
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unset and blank variables leave the current value alone.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        use self::env_vars as ev;

        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var(ev::BASE_URL) {
            self.endpoints.base_url = v;
        }
        if let Some(v) = var(ev::ALL_USERS_PATH) {
            self.endpoints.all_users_path = v;
        }
        if let Some(v) = var(ev::USERS_BY_REGION_PATH) {
            self.endpoints.users_by_region_path = v;
        }
        if let Some(v) = var(ev::HEADER_MODE) {
            self.auth.header_mode = v.parse()?;
        }
        if let Some(v) = var(ev::HEADER_NAME) {
            self.auth.header_name = v;
        }
        if let Some(v) = var(ev::REGIONS) {
            self.regions = RegionCatalog::from_codes(v.split(','));
        }
        if let Some(v) = var(ev::PAGINATION_STRATEGY) {
            self.pagination.strategy = v.parse()?;
        }
        if let Some(v) = var(ev::CURSOR_PARAM) {
            self.pagination.cursor_param = v;
        }
        if let Some(v) = var(ev::NEXT_CURSOR_PATH) {
            self.pagination.next_cursor_path = v;
        }
        if let Some(v) = var(ev::LIMIT_PARAM) {
            self.pagination.limit_param = v;
        }
        if let Some(v) = var(ev::OFFSET_PARAM) {
            self.pagination.offset_param = v;
        }
        if let Some(v) = var(ev::PAGE_SIZE) {
            self.pagination.page_size = parse_var(ev::PAGE_SIZE, &v)?;
        }
        if let Some(v) = var(ev::ITEMS_PATH) {
            self.pagination.items_path = v;
        }
        if let Some(v) = var(ev::MODE) {
            self.mode = v.parse()?;
        }
        if let Some(v) = var(ev::MAX_RETRIES) {
            self.retry.max_retries = parse_var(ev::MAX_RETRIES, &v)?;
        }
        if let Some(v) = var(ev::INITIAL_BACKOFF_MS) {
            self.retry.initial_backoff_ms = parse_var(ev::INITIAL_BACKOFF_MS, &v)?;
        }
        if let Some(v) = var(ev::BACKOFF_FACTOR) {
            self.retry.backoff_factor = parse_var(ev::BACKOFF_FACTOR, &v)?;
        }
        if let Some(v) = var(ev::HTTP_TIMEOUT_SECONDS) {
            self.http.timeout_seconds = parse_var(ev::HTTP_TIMEOUT_SECONDS, &v)?;
        }

        Ok(())
    }

    /// Validate the merged configuration
    pub fn validate(&self) -> Result<()> {
        self.endpoints.validate()?;
        self.auth.validate()?;
        self.pagination.validate()?;
        self.retry.policy().validate()?;
        self.http.validate()?;
        if self.mode == FetchMode::Regional {
            self.regions.validate()?;
        }
        Ok(())
    }

    /// Build the aggregator described by this configuration
    pub fn aggregator(&self) -> Result<Aggregator> {
        let retrier = Retrier::new(self.retry.policy());
        let client = ApiClient::with_config(self.http.client_config(), retrier)?;
        let engine = PageEngine::new(client, self.pagination.clone());
        let catalog = Arc::new(self.regions.clone());
        let fetcher = RegionFetcher::new(engine, self.endpoints.clone(), self.auth.clone())
            .with_default_region(catalog.default_region());

        Ok(Aggregator::new(fetcher, catalog, self.mode))
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::invalid_value(name, format!("'{value}': {e}")))
}

// ============================================================================
// Retry Config
// ============================================================================

/// Retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    pub initial_backoff_ms: u64,
    /// Growth factor per retry
    pub backoff_factor: f64,
    /// Cap on a single wait in milliseconds
    pub max_backoff_ms: u64,
    /// Randomize waits by up to ±15%
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff_ms: 500,
            backoff_factor: 2.0,
            max_backoff_ms: 60_000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Retry policy for these settings
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.initial_backoff_ms),
            self.backoff_factor,
        )
        .with_jitter(self.jitter)
        .with_max_delay(Duration::from_millis(self.max_backoff_ms))
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
        }
    }
}

impl HttpConfig {
    /// Validate the HTTP settings
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::invalid_value("http.timeout_seconds", "must be positive"));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.connect_timeout_seconds",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Client config for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .connect_timeout(Duration::from_secs(self.connect_timeout_seconds))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::HeaderMode;
    use crate::pagination::PaginationStrategy;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(
            config.endpoints.base_url,
            "https://{region}.api.insight.rapid7.com/account"
        );
        assert_eq!(config.endpoints.all_users_path, "/api/1/users");
        assert_eq!(config.endpoints.users_by_region_path, "/api/1/users");
        assert_eq!(config.auth.header_mode, HeaderMode::ApiKey);
        assert_eq!(config.auth.header_name, "X-Api-Key");
        assert_eq!(config.regions.codes(), vec!["us", "eu", "ap", "ca", "au"]);
        assert_eq!(config.pagination.strategy, PaginationStrategy::None);
        assert_eq!(config.mode, FetchMode::Regional);

        let policy = config.retry.policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert!((policy.factor - 2.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
base_url: "https://{region}.users.example.com"
users_by_region_path: /v2/users
auth:
  header_mode: bearer
regions:
  - code: us
    name: United States
  - code: eu
    name: Europe
pagination:
  strategy: cursor
  next_cursor_path: meta.next
retry:
  max_retries: 2
  jitter: false
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.endpoints.base_url, "https://{region}.users.example.com");
        assert_eq!(config.endpoints.users_by_region_path, "/v2/users");
        assert_eq!(config.endpoints.all_users_path, "/api/1/users");
        assert_eq!(config.auth.header_mode, HeaderMode::Bearer);
        assert_eq!(config.regions.get("eu").unwrap().name, "Europe");
        assert_eq!(config.pagination.strategy, PaginationStrategy::Cursor);
        assert_eq!(config.pagination.next_cursor_path, "meta.next");
        assert_eq!(config.retry.max_retries, 2);
        assert!(!config.retry.jitter);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = AppConfig::from_yaml("pagination:\n  strategy: link_header\n").unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode: single_endpoint\nall_users_path: /all").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode, FetchMode::SingleEndpoint);
        assert_eq!(config.endpoints.all_users_path, "/all");
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(overrides(&[
                ("BASE_URL", "http://localhost:9000/{region}"),
                ("HEADER_MODE", "Bearer"),
                ("REGIONS", "eu, us ,,ap"),
                ("PAGINATION_STRATEGY", "OFFSET"),
                ("PAGE_SIZE", "25"),
                ("ITEMS_PATH", "data.users"),
                ("MODE", "all"),
                ("MAX_RETRIES", "0"),
                ("INITIAL_BACKOFF_MS", "10"),
                ("BACKOFF_FACTOR", "1.5"),
                ("LIMIT_PARAM", ""),
            ]))
            .unwrap();

        assert_eq!(config.endpoints.base_url, "http://localhost:9000/{region}");
        assert_eq!(config.auth.header_mode, HeaderMode::Bearer);
        assert_eq!(config.regions.codes(), vec!["eu", "us", "ap"]);
        assert_eq!(config.pagination.strategy, PaginationStrategy::Offset);
        assert_eq!(config.pagination.page_size, 25);
        assert_eq!(config.pagination.limit_param, "limit");
        assert_eq!(config.pagination.items_path, "data.users");
        assert_eq!(config.mode, FetchMode::SingleEndpoint);
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.retry.initial_backoff_ms, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_overrides_rejects_bad_values() {
        let err = AppConfig::default()
            .apply_overrides(overrides(&[("HEADER_MODE", "basic")]))
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported HEADER_MODE"));

        let err = AppConfig::default()
            .apply_overrides(overrides(&[("PAGE_SIZE", "many")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "PAGE_SIZE"));

        let err = AppConfig::default()
            .apply_overrides(overrides(&[("PAGINATION_STRATEGY", "pages")]))
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_merged_config() {
        let mut config = AppConfig::default();
        config.retry.backoff_factor = 1.0;
        assert!(config.validate().unwrap_err().is_config());

        let mut config = AppConfig::default();
        config.regions = RegionCatalog::new(vec![]);
        assert!(config.validate().is_err());
        config.mode = FetchMode::SingleEndpoint;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.pagination = PaginationConfig::offset("limit", "offset", 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aggregator_from_config() {
        let mut config = AppConfig::default();
        config.regions = RegionCatalog::from_codes(["eu", "us"]);
        let aggregator = config.aggregator().unwrap();
        assert_eq!(aggregator.catalog().codes(), vec!["eu", "us"]);
        assert_eq!(aggregator.mode(), FetchMode::Regional);
    }
}
