//! Vault REST API access
//!
//! URL construction, the shared HTTP client and typed response bodies.

pub mod client;
pub mod types;

pub use client::{build_http_client, ApiResponse};
