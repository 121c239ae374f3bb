//! Pagination module
//!
//! Supports: None (single request), Cursor, Offset
//!
//! # Overview
//!
//! The pagination module provides a unified interface for handling different
//! API pagination patterns. Each strategy computes the query parameters for
//! the next page from the previous response and tracks when pagination is
//! complete. The page loop itself lives in [`crate::engine`].

mod strategies;
mod types;

pub use strategies::{CursorPaginator, NoPaginator, OffsetPaginator};
pub use types::{
    extract_items, NextPage, PaginationConfig, PaginationState, PaginationStrategy, Paginator,
};

#[cfg(test)]
mod tests;
