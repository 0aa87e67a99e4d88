//! OAuth client-credentials token exchange

use crate::api::client::{endpoint_url, TOKEN_PATH};
use crate::api::types::TokenResponse;
use crate::api::ApiResponse;
use crate::error::{Result, SafeError};
use crate::models::{AccessToken, Credentials};
use tracing::debug;
use zeroize::Zeroizing;

/// Exchanges client credentials for a bearer token.
///
/// Tokens are never cached; every run asks for a fresh one.
pub struct TokenProvider {
    http: reqwest::Client,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST a `client_credentials` grant and extract `access_token`.
    pub async fn acquire(&self, credentials: &Credentials) -> Result<AccessToken> {
        let url = endpoint_url(&credentials.api_url, TOKEN_PATH);
        debug!(client_id = %credentials.client_id, "requesting access token");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await?;
        let response = ApiResponse::read(response).await?;
        let status = response.status_code();

        if !response.is_ok() {
            return Err(SafeError::Authentication {
                message: response.body,
                status,
            });
        }

        let parsed = response
            .json::<TokenResponse>()
            .map_err(|message| SafeError::Authentication { message, status })?;
        // body held the token in clear text
        drop(Zeroizing::new(response.body));

        if parsed.access_token.is_empty() {
            return Err(SafeError::Authentication {
                message: "token response has an empty access_token".to_string(),
                status,
            });
        }

        debug!(expires_in = ?parsed.expires_in, "access token acquired");
        Ok(AccessToken::new(parsed.access_token))
    }
}
