//! Region module
//!
//! Regions are the independent backend deployments a user base is spread
//! over. Each region serves the same API under its own host.
//!
//! # Overview
//!
//! The region module provides:
//! - `RegionCatalog` - ordered, immutable list of known regions
//! - `RegionSelection` - one region or the whole catalog
//! - `EndpointConfig` - base URL template and endpoint paths
//! - `RegionFetcher` - complete paginated fetch for one region

mod fetcher;
mod types;

pub use fetcher::RegionFetcher;
pub use types::{
    resolve_endpoint, EndpointConfig, RegionCatalog, RegionDescriptor, RegionSelection,
    ALL_REGIONS, DEFAULT_REGION, REGION_PLACEHOLDER,
};

#[cfg(test)]
mod tests;
