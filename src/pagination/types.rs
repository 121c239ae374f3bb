//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use super::strategies::{CursorPaginator, NoPaginator, OffsetPaginator};
use crate::error::{Error, Result};
use crate::json_path::JsonPath;
use crate::types::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters for the next request
        query_params: QueryParams,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: QueryParams) -> Self {
        Self::Continue {
            query_params: params,
        }
    }

    /// Create a continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Continue {
            query_params: vec![(key.into(), value.into())],
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Page-advance protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationStrategy {
    /// Single request
    #[default]
    None,
    /// Opaque token echoed back to the server
    Cursor,
    /// Numeric offset/limit
    Offset,
}

impl std::str::FromStr for PaginationStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "cursor" => Ok(Self::Cursor),
            "offset" => Ok(Self::Offset),
            other => Err(Error::config(format!(
                "Unsupported pagination strategy: {other}"
            ))),
        }
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Which page-advance algorithm runs
    pub strategy: PaginationStrategy,
    /// Query parameter carrying the cursor
    pub cursor_param: String,
    /// Dot path of the next cursor in a response
    pub next_cursor_path: String,
    /// Query parameter carrying the page size
    pub limit_param: String,
    /// Query parameter carrying the offset
    pub offset_param: String,
    /// Records requested per page (offset strategy)
    pub page_size: u32,
    /// Dot path of the items array when the response is an object
    pub items_path: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            strategy: PaginationStrategy::None,
            cursor_param: "cursor".to_string(),
            next_cursor_path: "nextCursor".to_string(),
            limit_param: "limit".to_string(),
            offset_param: "offset".to_string(),
            page_size: 100,
            items_path: "items".to_string(),
        }
    }
}

impl PaginationConfig {
    /// Single-request config
    pub fn none() -> Self {
        Self::default()
    }

    /// Create cursor pagination config
    pub fn cursor(cursor_param: impl Into<String>, next_cursor_path: impl Into<String>) -> Self {
        Self {
            strategy: PaginationStrategy::Cursor,
            cursor_param: cursor_param.into(),
            next_cursor_path: next_cursor_path.into(),
            ..Default::default()
        }
    }

    /// Create offset pagination config
    pub fn offset(
        limit_param: impl Into<String>,
        offset_param: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            strategy: PaginationStrategy::Offset,
            limit_param: limit_param.into(),
            offset_param: offset_param.into(),
            page_size,
            ..Default::default()
        }
    }

    /// Set the items path
    #[must_use]
    pub fn with_items_path(mut self, path: impl Into<String>) -> Self {
        self.items_path = path.into();
        self
    }

    /// Validate the fields the selected strategy depends on
    pub fn validate(&self) -> Result<()> {
        match self.strategy {
            PaginationStrategy::None => {}
            PaginationStrategy::Cursor => {
                if self.cursor_param.trim().is_empty() {
                    return Err(Error::invalid_value("cursor_param", "cannot be empty"));
                }
                if JsonPath::parse(&self.next_cursor_path).is_root() {
                    return Err(Error::invalid_value("next_cursor_path", "cannot be empty"));
                }
            }
            PaginationStrategy::Offset => {
                if self.page_size == 0 {
                    return Err(Error::invalid_value("page_size", "must be positive"));
                }
                if self.limit_param.trim().is_empty() || self.offset_param.trim().is_empty() {
                    return Err(Error::invalid_value(
                        "limit_param/offset_param",
                        "cannot be empty",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the paginator for the configured strategy
    pub fn paginator(&self) -> Box<dyn Paginator> {
        match self.strategy {
            PaginationStrategy::None => Box::new(NoPaginator),
            PaginationStrategy::Cursor => Box::new(CursorPaginator::new(
                &self.cursor_param,
                JsonPath::parse(&self.next_cursor_path),
            )),
            PaginationStrategy::Offset => Box::new(OffsetPaginator::new(
                &self.limit_param,
                &self.offset_param,
                self.page_size,
            )),
        }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub page: u32,
    /// Current offset (for offset-based pagination)
    pub offset: u64,
    /// Current cursor value
    pub cursor: Option<String>,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Add offset
    pub fn add_offset(&mut self, amount: u64) {
        self.offset += amount;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Get query parameters for the first request
    fn initial_params(&self, state: &PaginationState) -> QueryParams;

    /// Process a response and determine if there's a next page
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage;
}

/// Pull the items array out of a page.
///
/// A top-level array is taken as-is; otherwise `items_path` must point at an
/// array.
pub fn extract_items(body: &Value, items_path: &JsonPath) -> Result<Vec<Value>> {
    if let Value::Array(items) = body {
        return Ok(items.clone());
    }

    match items_path.lookup(body) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(Error::malformed(format!(
            "expected an array at '{items_path}', found {}",
            json_kind(other)
        ))),
        None => Err(Error::malformed(format!(
            "no items found at '{items_path}'"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
