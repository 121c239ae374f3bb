//! HTTP server mode
//!
//! Small JSON proxy in front of the aggregator, for browser front ends that
//! cannot call the regional backends directly.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::aggregate::{Aggregator, FetchMode};
use crate::error::{Error, Result};
use crate::fields::scalar_string;
use crate::region::{RegionSelection, ALL_REGIONS};
use crate::types::{Filters, JsonObject};

/// App state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    aggregator: Aggregator,
}

impl AppState {
    /// Create server state around an aggregator
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }
}

/// Request body for the users endpoint
#[derive(Debug, Deserialize)]
struct UsersRequest {
    /// Region code or "all"
    #[serde(default)]
    region: Option<String>,
    /// Backend API key
    #[serde(default, rename = "apiKey")]
    api_key: Option<String>,
    /// Filter values; scalars are forwarded as strings
    #[serde(default)]
    filters: JsonObject,
}

/// Build the router
pub fn router(state: AppState) -> Router {
    // Allow all origins for browser front ends
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/regions", get(list_regions))
        .route("/api/users", post(fetch_users))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(aggregator: Aggregator, port: u16) -> Result<()> {
    let app = router(AppState::new(aggregator));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Region list, led by the synthetic "all" entry
async fn list_regions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let regions: Vec<Value> = std::iter::once(json!({"code": ALL_REGIONS, "name": "All Regions"}))
        .chain(
            state
                .aggregator
                .catalog()
                .iter()
                .map(|r| json!({"code": r.code, "name": r.name})),
        )
        .collect();

    Json(json!({ "regions": regions }))
}

/// Fetch users for a region or all regions
async fn fetch_users(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UsersRequest>,
) -> Response {
    let Some(api_key) = request.api_key.filter(|k| !k.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "API key is required");
    };

    let Some(selection) = parse_selection(&state.aggregator, request.region.as_deref()) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid region format");
    };

    let filters = filters_from_json(&request.filters);

    match state.aggregator.fetch(&selection, &api_key, &filters).await {
        Ok(result) => {
            if result.is_partial() {
                tracing::warn!(
                    "Returning {} users with {} failed regions",
                    result.records.len(),
                    result.failures.len()
                );
            }
            (StatusCode::OK, Json(result.records)).into_response()
        }
        Err(e) => {
            let failure = e.to_failure();
            let status =
                StatusCode::from_u16(failure.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let fanned_out =
                selection.is_all() && state.aggregator.mode() == FetchMode::Regional;
            let message = if fanned_out && e.region().is_some() {
                "API request failed for all regions".to_string()
            } else {
                failure.message.clone()
            };

            tracing::error!("Users request failed: {}", e);
            (
                status,
                Json(json!({
                    "error": message,
                    "details": failure.details,
                    "region": failure.region,
                })),
            )
                .into_response()
        }
    }
}

/// Parse and check the requested region against the catalog
fn parse_selection(aggregator: &Aggregator, region: Option<&str>) -> Option<RegionSelection> {
    let selection: RegionSelection = region?.parse().ok()?;
    match &selection {
        RegionSelection::Single(code)
            if aggregator.mode() == FetchMode::Regional && !aggregator.catalog().contains(code) =>
        {
            None
        }
        _ => Some(selection),
    }
}

/// Convert JSON filter values to forwarded strings; non-scalars are dropped
fn filters_from_json(filters: &JsonObject) -> Filters {
    filters
        .iter()
        .filter_map(|(key, value)| scalar_string(value).map(|v| (key.clone(), v)))
        .collect()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
