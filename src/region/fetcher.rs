//! Region fetcher
//!
//! Runs the page engine against one region's endpoint.

use super::types::{EndpointConfig, DEFAULT_REGION};
use crate::auth::{redact_key, AuthConfig};
use crate::engine::{PageEngine, PageRequest, PageResult};
use crate::error::Result;
use crate::types::{Filters, UserRecord};
use tracing::{debug, info};

/// Fetches the complete user list of one region
#[derive(Debug, Clone)]
pub struct RegionFetcher {
    engine: PageEngine,
    endpoints: EndpointConfig,
    auth: AuthConfig,
    default_region: String,
}

impl RegionFetcher {
    /// Create a new region fetcher
    pub fn new(engine: PageEngine, endpoints: EndpointConfig, auth: AuthConfig) -> Self {
        Self {
            engine,
            endpoints,
            auth,
            default_region: DEFAULT_REGION.to_string(),
        }
    }

    /// Set the region segment used by the single-endpoint mode
    #[must_use]
    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Endpoint configuration
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// Fetch every user of `region`.
    ///
    /// Errors are tagged with the region code.
    pub async fn fetch_region(
        &self,
        region: &str,
        api_key: &str,
        filters: &Filters,
    ) -> Result<Vec<UserRecord>> {
        let url = self
            .endpoints
            .region_url(region)
            .map_err(|e| e.in_region(region))?;
        let result = self
            .fetch_url(url, api_key, filters)
            .await
            .map_err(|e| e.in_region(region))?;

        info!(
            "Region {}: {} users in {} pages ({} ms)",
            region, result.stats.records_fetched, result.stats.pages_fetched, result.stats.duration_ms
        );
        Ok(result.items)
    }

    /// Fetch every user through the all-in-one endpoint
    pub async fn fetch_single_endpoint(
        &self,
        api_key: &str,
        filters: &Filters,
    ) -> Result<Vec<UserRecord>> {
        let url = self.endpoints.all_users_url(&self.default_region)?;
        let result = self.fetch_url(url, api_key, filters).await?;

        info!(
            "Single endpoint: {} users in {} pages ({} ms)",
            result.stats.records_fetched, result.stats.pages_fetched, result.stats.duration_ms
        );
        Ok(result.items)
    }

    async fn fetch_url(&self, url: String, api_key: &str, filters: &Filters) -> Result<PageResult> {
        debug!("GET {} (key {})", url, redact_key(api_key));

        let request = PageRequest::new(url)
            .with_query(filters.to_query())
            .with_headers(self.auth.headers(api_key));

        self.engine.fetch_all(&request).await
    }
}
