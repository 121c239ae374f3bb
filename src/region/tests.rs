//! Tests for region module

use super::*;
use crate::auth::AuthConfig;
use crate::engine::PageEngine;
use crate::http::{ApiClient, HttpClientConfig};
use crate::pagination::PaginationConfig;
use crate::retry::{Retrier, RetryPolicy};
use crate::types::Filters;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(base_url: String, max_retries: u32) -> RegionFetcher {
    let client = ApiClient::with_config(
        HttpClientConfig::default(),
        Retrier::new(RetryPolicy::fast(max_retries)),
    )
    .unwrap();
    let engine = PageEngine::new(client, PaginationConfig::none());
    let endpoints = EndpointConfig {
        base_url,
        all_users_path: "/api/1/all-users".to_string(),
        users_by_region_path: "/api/1/users".to_string(),
    };
    RegionFetcher::new(engine, endpoints, AuthConfig::default())
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[test_case("https://{region}.example.com/account", "eu", "/api/1/users", "https://eu.example.com/account/api/1/users" ; "template")]
#[test_case("https://{region}.example.com/account/", "eu", "api/1/users", "https://eu.example.com/account/api/1/users" ; "slashes normalized")]
#[test_case("https://example.com//", "us", "//users", "https://example.com/users" ; "repeated slashes")]
#[test_case("https://example.com", "ap", "", "https://example.com" ; "empty path")]
#[test_case("https://example.com/{region}", "a b", "/users", "https://example.com/a+b/users" ; "region encoded")]
fn test_resolve_endpoint(template: &str, region: &str, endpoint_path: &str, expected: &str) {
    assert_eq!(
        resolve_endpoint(template, region, endpoint_path).unwrap(),
        expected
    );
}

#[test]
fn test_resolve_endpoint_invalid_url() {
    let err = resolve_endpoint("not a url", "us", "/users").unwrap_err();
    assert!(matches!(err, crate::Error::InvalidUrl(_)));
}

#[test]
fn test_endpoint_config_default() {
    let config = EndpointConfig::default();
    assert_eq!(
        config.region_url("ca").unwrap(),
        "https://ca.api.insight.rapid7.com/account/api/1/users"
    );
    assert!(config.validate().is_ok());
    assert!(EndpointConfig::new("", "/users").validate().unwrap_err().is_config());
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[test]
fn test_default_catalog() {
    let catalog = RegionCatalog::default();
    assert_eq!(catalog.codes(), vec!["us", "eu", "ap", "ca", "au"]);
    assert_eq!(catalog.get("us").unwrap().name, "US (United States)");
    assert_eq!(catalog.default_region(), "us");
    assert!(catalog.validate().is_ok());
}

#[test]
fn test_catalog_lookup_is_case_insensitive() {
    let catalog = RegionCatalog::default();
    assert_eq!(catalog.get(" EU ").unwrap().code, "eu");
    assert!(catalog.contains("Ap"));
    assert!(!catalog.contains("mars"));
}

#[test]
fn test_catalog_from_codes() {
    let catalog = RegionCatalog::from_codes(["EU", " ", "jp"]);
    assert_eq!(catalog.codes(), vec!["eu", "jp"]);
    assert_eq!(catalog.get("jp").unwrap().name, "JP");
    assert_eq!(catalog.default_region(), "eu");
}

#[test]
fn test_catalog_validate() {
    assert!(RegionCatalog::new(vec![]).validate().is_err());
    assert!(RegionCatalog::from_codes(["us", "US"]).validate().is_err());
    assert!(RegionCatalog::from_codes(["us", "all"]).validate().is_err());
    assert_eq!(RegionCatalog::new(vec![]).default_region(), "us");
}

#[test]
fn test_catalog_deserialize() {
    let catalog: RegionCatalog =
        serde_yaml::from_str("- code: us\n  name: United States\n- code: eu\n  name: Europe\n")
            .unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("eu").unwrap().name, "Europe");
}

// ============================================================================
// Selection Tests
// ============================================================================

#[test_case("all", RegionSelection::All ; "all")]
#[test_case(" ALL ", RegionSelection::All ; "all uppercase")]
#[test_case("EU", RegionSelection::Single("eu".to_string()) ; "single")]
fn test_region_selection_from_str(input: &str, expected: RegionSelection) {
    assert_eq!(input.parse::<RegionSelection>().unwrap(), expected);
}

#[test]
fn test_region_selection_empty_is_unknown() {
    let err = "  ".parse::<RegionSelection>().unwrap_err();
    assert!(matches!(err, crate::Error::UnknownRegion { .. }));
    assert_eq!(RegionSelection::single("ca").to_string(), "ca");
    assert_eq!(RegionSelection::All.to_string(), "all");
}

// ============================================================================
// Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_region_resolves_region_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/eu/api/1/users"))
        .and(header("X-Api-Key", "secret"))
        .and(header("Accept", "application/json"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "1"}, {"id": "2"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(format!("{}/{{region}}", mock_server.uri()), 0);
    let users = fetcher
        .fetch_region("eu", "secret", &Filters::new().with("status", "active"))
        .await
        .unwrap();

    assert_eq!(users, vec![json!({"id": "1"}), json!({"id": "2"})]);
}

#[tokio::test]
async fn test_fetch_region_tags_errors_with_region() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ap/api/1/users"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "gone"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(format!("{}/{{region}}", mock_server.uri()), 2);
    let err = fetcher
        .fetch_region("ap", "secret", &Filters::new())
        .await
        .unwrap_err();

    assert_eq!(err.region(), Some("ap"));
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.details(), json!({"message": "gone"}));
}

#[tokio::test]
async fn test_fetch_single_endpoint_uses_default_region() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ca/api/1/all-users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "x"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(format!("{}/{{region}}", mock_server.uri()), 0).with_default_region("ca");
    let users = fetcher
        .fetch_single_endpoint("secret", &Filters::new())
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
}
