// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # regional-users
//!
//! Retrieves user records from an API deployed in several independent
//! regions and merges them into one deduplicated list.
//!
//! ## Features
//!
//! - **Region fan-out**: All regions fetched concurrently, partial failures tolerated
//! - **Pagination**: Cursor, offset, or single page, configured per deployment
//! - **Retries**: Exponential backoff with jitter for 429, 5xx and transport errors
//! - **Deduplication**: First occurrence wins, in region catalog order
//! - **Surfaces**: CLI with table/JSON output and a small HTTP proxy
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use regional_users::{AppConfig, Filters, RegionSelection, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let aggregator = config.aggregator()?;
//!
//!     let filters = Filters::new().with("status", "active");
//!     let result = aggregator
//!         .fetch(&RegionSelection::All, "my-api-key", &filters)
//!         .await?;
//!
//!     println!("{} users", result.records.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                Aggregator::fetch(selection, key)                │
//! │      join_all over regions → merge in catalog order → dedupe    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴─┬───────────────┬────────────────┐
//! │ RegionFetcher │   PageEngine   │   ApiClient   │    Retrier     │
//! ├───────────────┼────────────────┼───────────────┼────────────────┤
//! │ URL template  │ Cursor         │ GET + JSON    │ Backoff        │
//! │ Auth header   │ Offset         │ Status map    │ Jitter         │
//! │ Filters       │ None           │               │                │
//! └───────────────┴────────────────┴───────────────┴────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Dot-path lookup into JSON values
pub mod json_path;

/// Candidate-key field extraction
pub mod fields;

/// Backoff retries
pub mod retry;

/// HTTP client
pub mod http;

/// API key headers
pub mod auth;

/// Pagination strategies
pub mod pagination;

/// Page loop
pub mod engine;

/// Region catalog and per-region fetches
pub mod region;

/// Fan-out and merge
pub mod aggregate;

/// Application configuration
pub mod config;

/// Table and JSON output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchFailure, Result};
pub use types::*;

// Re-export commonly used types
pub use aggregate::{Aggregator, FetchMode, FetchResult};
pub use config::AppConfig;
pub use region::{RegionCatalog, RegionSelection};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
