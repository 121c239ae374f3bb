//! Region types
//!
//! Catalog, selection and endpoint resolution.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder substituted with the region code in the base URL
pub const REGION_PLACEHOLDER: &str = "{region}";

/// Selection value meaning "every region in the catalog"
pub const ALL_REGIONS: &str = "all";

/// Region segment used when the catalog is empty
pub const DEFAULT_REGION: &str = "us";

const DEFAULT_BASE_URL: &str = "https://{region}.api.insight.rapid7.com/account";
const DEFAULT_USERS_PATH: &str = "/api/1/users";

// ============================================================================
// Region Catalog
// ============================================================================

/// A known region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    /// Short code used in URLs (e.g. "us")
    pub code: String,
    /// Human-readable name
    pub name: String,
}

impl RegionDescriptor {
    /// Create a new region descriptor
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Descriptor for a bare code, named after the well-known region when
    /// there is one
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        let name = match code.as_str() {
            "us" => "US (United States)".to_string(),
            "eu" => "EU (Europe)".to_string(),
            "ap" => "AP (Asia Pacific)".to_string(),
            "ca" => "CA (Canada)".to_string(),
            "au" => "AU (Australia)".to_string(),
            other => other.to_uppercase(),
        };
        Self { code, name }
    }
}

/// Ordered list of regions.
///
/// Order is significant: it decides which copy of a duplicated record wins
/// and which failure is reported when every region fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCatalog {
    regions: Vec<RegionDescriptor>,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::from_codes(["us", "eu", "ap", "ca", "au"])
    }
}

impl RegionCatalog {
    /// Create a catalog from descriptors
    pub fn new(regions: Vec<RegionDescriptor>) -> Self {
        Self { regions }
    }

    /// Create a catalog from bare region codes
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            codes
                .into_iter()
                .filter(|code| !code.as_ref().trim().is_empty())
                .map(|code| RegionDescriptor::from_code(code.as_ref()))
                .collect(),
        )
    }

    /// Look up a region by code, ignoring case and surrounding whitespace
    pub fn get(&self, code: &str) -> Option<&RegionDescriptor> {
        let code = code.trim();
        self.regions
            .iter()
            .find(|region| region.code.eq_ignore_ascii_case(code))
    }

    /// Check whether a region code is known
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Iterate regions in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &RegionDescriptor> {
        self.regions.iter()
    }

    /// Region codes in catalog order
    pub fn codes(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.code.as_str()).collect()
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region segment for the single-endpoint mode
    pub fn default_region(&self) -> &str {
        self.regions
            .first()
            .map_or(DEFAULT_REGION, |r| r.code.as_str())
    }

    /// Validate the catalog
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(Error::invalid_value("regions", "at least one region is required"));
        }

        for (i, region) in self.regions.iter().enumerate() {
            if region.code.trim().is_empty() {
                return Err(Error::invalid_value("regions", "region code cannot be empty"));
            }
            if region.code.eq_ignore_ascii_case(ALL_REGIONS) {
                return Err(Error::invalid_value(
                    "regions",
                    format!("'{ALL_REGIONS}' is reserved and cannot be a region code"),
                ));
            }
            if self.regions[..i]
                .iter()
                .any(|other| other.code.eq_ignore_ascii_case(&region.code))
            {
                return Err(Error::invalid_value(
                    "regions",
                    format!("duplicate region code '{}'", region.code),
                ));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a RegionCatalog {
    type Item = &'a RegionDescriptor;
    type IntoIter = std::slice::Iter<'a, RegionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

// ============================================================================
// Region Selection
// ============================================================================

/// Which regions a fetch covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionSelection {
    /// Every region in the catalog
    #[default]
    All,
    /// One region code
    Single(String),
}

impl RegionSelection {
    /// Select one region
    pub fn single(code: impl Into<String>) -> Self {
        Self::Single(code.into())
    }

    /// Check whether this selects the whole catalog
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl FromStr for RegionSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        if code.is_empty() {
            return Err(Error::UnknownRegion {
                region: s.to_string(),
            });
        }
        if code.eq_ignore_ascii_case(ALL_REGIONS) {
            Ok(Self::All)
        } else {
            Ok(Self::Single(code.to_lowercase()))
        }
    }
}

impl fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_REGIONS),
            Self::Single(code) => f.write_str(code),
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Where the users API lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL template; `{region}` is replaced by the region code
    pub base_url: String,
    /// Path used by the single-endpoint mode
    pub all_users_path: String,
    /// Path used for per-region fetches
    pub users_by_region_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            all_users_path: DEFAULT_USERS_PATH.to_string(),
            users_by_region_path: DEFAULT_USERS_PATH.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Create an endpoint config using the same path for both modes
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            base_url: base_url.into(),
            all_users_path: path.clone(),
            users_by_region_path: path,
        }
    }

    /// URL of the per-region users endpoint
    pub fn region_url(&self, region: &str) -> Result<String> {
        resolve_endpoint(&self.base_url, region, &self.users_by_region_path)
    }

    /// URL of the single-endpoint users endpoint
    pub fn all_users_url(&self, region: &str) -> Result<String> {
        resolve_endpoint(&self.base_url, region, &self.all_users_path)
    }

    /// Validate the endpoint config
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::invalid_value("base_url", "cannot be empty"));
        }
        resolve_endpoint(&self.base_url, DEFAULT_REGION, &self.users_by_region_path)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        Ok(())
    }
}

/// Build a concrete endpoint URL.
///
/// `{region}` in the template is replaced with the percent-encoded region
/// code, trailing slashes are trimmed from the base and the path always
/// starts with a single slash.
pub fn resolve_endpoint(base_url_template: &str, region: &str, path: &str) -> Result<String> {
    let encoded: String = url::form_urlencoded::byte_serialize(region.as_bytes()).collect();
    let base = base_url_template.replace(REGION_PLACEHOLDER, &encoded);
    let base = base.trim_end_matches('/');
    let path = path.trim();

    let url = if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{}", path.trim_start_matches('/'))
    };

    url::Url::parse(&url)?;
    Ok(url)
}
