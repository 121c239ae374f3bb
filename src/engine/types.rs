//! Engine types
//!
//! Request and result types for the page engine.

use crate::types::{HeaderList, QueryParams, UserRecord};

/// One logical paginated fetch
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Fully resolved endpoint URL
    pub url: String,
    /// Fixed query parameters sent with every page (filters)
    pub query: QueryParams,
    /// Fixed headers sent with every page
    pub headers: HeaderList,
}

impl PageRequest {
    /// Create a request for an endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the fixed query parameters
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set the fixed headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderList) -> Self {
        self.headers = headers;
        self
    }

    /// Query for one page: fixed parameters, with page parameters taking
    /// precedence over any fixed parameter of the same name
    pub fn page_query(&self, page_params: &QueryParams) -> QueryParams {
        self.query
            .iter()
            .filter(|(key, _)| !page_params.iter().any(|(page_key, _)| page_key == key))
            .chain(page_params)
            .cloned()
            .collect()
    }
}

/// Statistics from a paginated fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Total records fetched
    pub records_fetched: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PageStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with its record count
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_fetched += records;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// All items of a paginated fetch, in page order
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Accumulated items
    pub items: Vec<UserRecord>,
    /// Fetch statistics
    pub stats: PageStats,
}
