//! Page engine module
//!
//! Drives repeated calls to one endpoint under a pagination strategy.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PageEngine` - serial page loop, every page wrapped by the retrier
//! - `PageRequest` - endpoint URL plus fixed query and headers
//! - `PageResult` / `PageStats` - accumulated items and counters
//!
//! Page N+1 is never requested before page N has succeeded, because the next
//! cursor or offset is derived from the previous page.

mod types;

pub use types::{PageRequest, PageResult, PageStats};

use crate::error::Result;
use crate::http::ApiClient;
use crate::json_path::JsonPath;
use crate::pagination::{extract_items, NextPage, PaginationConfig, PaginationState};
use std::time::Instant;
use tracing::debug;

/// Page engine for one pagination configuration
#[derive(Debug, Clone)]
pub struct PageEngine {
    /// JSON client (retries included)
    client: ApiClient,
    /// Pagination configuration
    config: PaginationConfig,
    /// Parsed items path
    items_path: JsonPath,
}

impl PageEngine {
    /// Create a new page engine
    pub fn new(client: ApiClient, config: PaginationConfig) -> Self {
        let items_path = JsonPath::parse(&config.items_path);
        Self {
            client,
            config,
            items_path,
        }
    }

    /// Get the pagination configuration
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Fetch every page of `request` and return the items in page order
    pub async fn fetch_all(&self, request: &PageRequest) -> Result<PageResult> {
        let start = Instant::now();
        let paginator = self.config.paginator();
        let mut state = PaginationState::new();
        let mut stats = PageStats::new();
        let mut items = Vec::new();

        let mut page_params = paginator.initial_params(&state);

        loop {
            let query = request.page_query(&page_params);
            let body = self
                .client
                .get_json(&request.url, &query, &request.headers)
                .await?;

            let page_items = extract_items(&body, &self.items_path)?;
            let record_count = page_items.len();
            items.extend(page_items);
            stats.add_page(record_count);

            debug!(
                "Page {}: fetched {} records from {}",
                stats.pages_fetched, record_count, request.url
            );

            match paginator.process_response(&body, record_count, &mut state) {
                NextPage::Continue { query_params } => page_params = query_params,
                NextPage::Done => break,
            }
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        debug!(
            "Completed {}: {} records in {} pages",
            request.url, stats.records_fetched, stats.pages_fetched
        );

        Ok(PageResult { items, stats })
    }
}
