//! Fan-out aggregation module
//!
//! Fetches users from one region or from every region concurrently and
//! merges the results into one deduplicated list.
//!
//! # Overview
//!
//! The aggregate module provides:
//! - `Aggregator` - the top-level fetch operation
//! - `FetchMode` - per-region fan-out or a single all-in-one endpoint
//! - `FetchResult` - merged records plus the failures tolerated on the way
//! - `IdentityKey` / `Merger` - first-seen deduplication
//!
//! # Failure policy
//!
//! Region fetches are settled together; one failing region never cancels
//! the others. If the merge holds at least one record the fetch succeeds and
//! the failed regions are reported in [`FetchResult::failures`]. If nothing
//! was merged, the failure of the earliest region in catalog order is
//! returned.

mod identity;
mod merge;

pub use identity::IdentityKey;
pub use merge::{annotate_region, dedupe, Merger};

use crate::error::{Error, FetchFailure, Result};
use crate::region::{RegionCatalog, RegionFetcher, RegionSelection};
use crate::types::{Filters, UserRecord};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

// ============================================================================
// Types
// ============================================================================

/// How users are retrieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// One request chain per catalog region
    #[default]
    Regional,
    /// One all-in-one endpoint
    SingleEndpoint,
}

impl FromStr for FetchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regional" | "region" => Ok(Self::Regional),
            "single_endpoint" | "single-endpoint" | "all" => Ok(Self::SingleEndpoint),
            other => Err(Error::config(format!("Unsupported MODE: {other}"))),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regional => f.write_str("regional"),
            Self::SingleEndpoint => f.write_str("single_endpoint"),
        }
    }
}

/// Result of a top-level fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchResult {
    /// Merged records, in catalog order then response order
    pub records: Vec<UserRecord>,
    /// Regions that returned successfully
    pub regions_covered: usize,
    /// Regions that failed while others succeeded
    pub failures: Vec<FetchFailure>,
}

impl FetchResult {
    /// Result with no tolerated failures
    pub fn complete(records: Vec<UserRecord>, regions_covered: usize) -> Self {
        Self {
            records,
            regions_covered,
            failures: Vec::new(),
        }
    }

    /// Check whether some regions failed
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Top-level user retrieval
#[derive(Debug, Clone)]
pub struct Aggregator {
    fetcher: RegionFetcher,
    catalog: Arc<RegionCatalog>,
    mode: FetchMode,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(fetcher: RegionFetcher, catalog: Arc<RegionCatalog>, mode: FetchMode) -> Self {
        Self {
            fetcher,
            catalog,
            mode,
        }
    }

    /// Region catalog
    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Fetch mode
    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Fetch users for `selection`.
    ///
    /// In single-endpoint mode the selection is ignored.
    pub async fn fetch(
        &self,
        selection: &RegionSelection,
        api_key: &str,
        filters: &Filters,
    ) -> Result<FetchResult> {
        let start = Instant::now();

        let result = match (self.mode, selection) {
            (FetchMode::SingleEndpoint, _) => {
                let records = self.fetcher.fetch_single_endpoint(api_key, filters).await?;
                FetchResult::complete(records, 1)
            }
            (FetchMode::Regional, RegionSelection::Single(code)) => {
                self.fetch_one(code, api_key, filters).await?
            }
            (FetchMode::Regional, RegionSelection::All) => {
                self.fetch_all(api_key, filters).await?
            }
        };

        info!(
            "Fetched {} users from {} regions in {} ms",
            result.records.len(),
            result.regions_covered,
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    async fn fetch_one(&self, code: &str, api_key: &str, filters: &Filters) -> Result<FetchResult> {
        let region = self.catalog.get(code).ok_or_else(|| Error::UnknownRegion {
            region: code.to_string(),
        })?;

        let records = self
            .fetcher
            .fetch_region(&region.code, api_key, filters)
            .await?
            .into_iter()
            .map(|record| annotate_region(record, &region.code))
            .collect();

        Ok(FetchResult::complete(records, 1))
    }

    async fn fetch_all(&self, api_key: &str, filters: &Filters) -> Result<FetchResult> {
        if self.catalog.is_empty() {
            return Err(Error::config("no regions configured"));
        }

        debug!("Dispatching {} region fetches", self.catalog.len());
        let outcomes = join_all(self.catalog.iter().map(|region| async move {
            let outcome = self.fetcher.fetch_region(&region.code, api_key, filters).await;
            (region.code.as_str(), outcome)
        }))
        .await;

        let mut merger = Merger::new();
        let mut errors = Vec::new();
        let mut regions_covered = 0;

        for (code, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    debug!("Region {}: merging {} records", code, records.len());
                    merger.push_region(code, records);
                    regions_covered += 1;
                }
                Err(e) => {
                    warn!("Region {} failed: {}", code, e);
                    errors.push(e);
                }
            }
        }

        if merger.is_empty() && !errors.is_empty() {
            return Err(errors.remove(0));
        }

        debug!(
            "Merged {} records, dropped {} duplicates",
            merger.len(),
            merger.duplicates()
        );

        Ok(FetchResult {
            records: merger.into_records(),
            regions_covered,
            failures: errors.iter().map(Error::to_failure).collect(),
        })
    }
}
