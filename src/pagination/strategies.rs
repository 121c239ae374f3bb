//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{NextPage, PaginationState, Paginator};
use crate::json_path::JsonPath;
use crate::types::QueryParams;
use serde_json::Value;

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination
///
/// Uses a cursor value from the response to fetch the next page.
/// Common patterns:
/// - `?cursor=abc123` with `{"nextCursor": "abc123"}`
/// - `?page_token=...` with `{"meta": {"next": "..."}}`
///
/// There is no iteration cap: a backend that always returns a cursor keeps
/// the loop going.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Query parameter name for cursor
    pub cursor_param: String,
    /// Path of the next cursor in the response
    pub cursor_path: JsonPath,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(cursor_param: impl Into<String>, cursor_path: impl Into<JsonPath>) -> Self {
        Self {
            cursor_param: cursor_param.into(),
            cursor_path: cursor_path.into(),
        }
    }
}

impl Paginator for CursorPaginator {
    fn initial_params(&self, state: &PaginationState) -> QueryParams {
        state
            .cursor
            .iter()
            .map(|cursor| (self.cursor_param.clone(), cursor.clone()))
            .collect()
    }

    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.next_page();

        match self.cursor_path.lookup_token(body) {
            Some(cursor) => {
                state.set_cursor(cursor.clone());
                NextPage::with_param(&self.cursor_param, cursor)
            }
            None => {
                state.mark_done();
                NextPage::Done
            }
        }
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Uses limit and offset parameters to paginate.
/// Common patterns:
/// - `?limit=50&offset=100`
/// - `?take=50&skip=100`
///
/// The offset advances by the number of records actually returned, and a
/// short or empty page ends pagination.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for limit
    pub limit_param: String,
    /// Query parameter name for offset
    pub offset_param: String,
    /// Number of records per page
    pub page_size: u32,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(
        limit_param: impl Into<String>,
        offset_param: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            limit_param: limit_param.into(),
            offset_param: offset_param.into(),
            page_size,
        }
    }

    fn params(&self, offset: u64) -> QueryParams {
        vec![
            (self.limit_param.clone(), self.page_size.to_string()),
            (self.offset_param.clone(), offset.to_string()),
        ]
    }
}

impl Paginator for OffsetPaginator {
    fn initial_params(&self, state: &PaginationState) -> QueryParams {
        self.params(state.offset)
    }

    fn process_response(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.next_page();

        // Empty or short page means end of data
        if records_count == 0 || records_count < self.page_size as usize {
            state.mark_done();
            return NextPage::Done;
        }

        state.add_offset(records_count as u64);
        NextPage::with_params(self.params(state.offset))
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn initial_params(&self, _state: &PaginationState) -> QueryParams {
        QueryParams::new()
    }

    fn process_response(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.next_page();
        state.mark_done();
        NextPage::Done
    }
}
