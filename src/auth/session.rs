//! Vault API session
//!
//! `SessionClient::sign_in` turns an access token into an `AuthenticatedSession`.
//! Every later vault call goes through that session and carries the same bearer
//! header; the shared client also keeps the session cookie set at sign-in.

use crate::api::client::{endpoint_url, SIGN_IN_PATH, SIGN_OUT_PATH};
use crate::api::ApiResponse;
use crate::error::{Result, SafeError};
use crate::models::AccessToken;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde::Serialize;
use tracing::debug;

/// Performs the API sign-in
pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SessionClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Sign in with the bearer token. Only HTTP 200 is required.
    pub async fn sign_in(self, token: AccessToken) -> Result<AuthenticatedSession> {
        let url = endpoint_url(&self.base_url, SIGN_IN_PATH);
        debug!("signing in");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await?;
        let response = ApiResponse::read(response).await?;

        if !response.is_ok() {
            return Err(SafeError::Session {
                status: response.status_code(),
                message: response.body,
            });
        }

        debug!("signed in");
        Ok(AuthenticatedSession {
            http: self.http,
            base_url: self.base_url,
            token,
        })
    }
}

/// Signed-in session bound to one access token
pub struct AuthenticatedSession {
    http: reqwest::Client,
    base_url: String,
    token: AccessToken,
}

impl AuthenticatedSession {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.token.bearer())
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        let request = self.authorized(self.http.get(self.url(path))).query(query);
        ApiResponse::read(request.send().await?).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let request = self.authorized(self.http.post(self.url(path))).json(body);
        ApiResponse::read(request.send().await?).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let request = self.authorized(self.http.put(self.url(path))).json(body);
        ApiResponse::read(request.send().await?).await
    }

    /// End the vault session. Consumes the session; the token dies with it.
    pub async fn sign_out(self) -> Result<()> {
        let request = self.authorized(self.http.post(self.url(SIGN_OUT_PATH)));
        let response = ApiResponse::read(request.send().await?).await?;

        if !response.status.is_success() {
            return Err(SafeError::Session {
                status: response.status_code(),
                message: response.body,
            });
        }
        debug!("signed out");
        Ok(())
    }
}
