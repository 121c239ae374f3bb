//! HTTP client module
//!
//! Provides the GET transport used by the pagination engine and a JSON client
//! that wraps every attempt in the backoff retrier.
//!
//! # Features
//!
//! - **Transport seam**: `HttpTransport` trait, reqwest-backed by default
//! - **Status classification**: 401/403 become auth errors, other 4xx/5xx
//!   become status errors carrying the raw body
//! - **Retries**: only the HTTP exchange is retried, never JSON parsing

mod client;

pub use client::{
    classify_response, parse_json_body, ApiClient, HttpClientConfig, HttpClientConfigBuilder,
    HttpTransport, RawResponse, ReqwestTransport,
};
