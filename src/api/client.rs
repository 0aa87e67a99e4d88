//! Vault HTTP plumbing
//!
//! Endpoint paths, the shared `reqwest` client, and response capture. Every
//! endpoint reads the status and the full body text first, then decodes.

use crate::error::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

pub const TOKEN_PATH: &str = "Auth/connect/token";
pub const SIGN_IN_PATH: &str = "Auth/SignAppIn";
pub const SIGN_OUT_PATH: &str = "Auth/Signout";
pub const MANAGED_ACCOUNTS_PATH: &str = "ManagedAccounts";
pub const REQUESTS_PATH: &str = "Requests";
pub const CREDENTIALS_PATH: &str = "Credentials";
pub const SECRETS_PATH: &str = "secrets-safe/secrets";

/// Build the HTTP client shared by one run.
///
/// The cookie store keeps the session cookie issued at sign-in.
pub fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent())
        .cookie_store(true)
        .build()?;
    Ok(client)
}

fn user_agent() -> String {
    format!("secrets-safe/{}", env!("CARGO_PKG_VERSION"))
}

/// `{base_url}/{path}`, `base_url` already stripped of its trailing slash
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url, path.trim_start_matches('/'))
}

/// Percent-encode a value used as a single URL path segment.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Status and body text of a vault response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    /// The vault answers 200 for lookups and fetches
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Decode the body as JSON, keeping the serde error text for the caller.
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, String> {
        serde_json::from_str(&self.body)
            .map_err(|e| format!("Failed to parse response: {} - {}", e, self.body))
    }
}
