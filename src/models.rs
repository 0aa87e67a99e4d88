//! Data models
//!
//! Values flowing through one retrieval run. Nothing here outlives the run.

use crate::error::{Result, SafeError};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;
use zeroize::Zeroizing;

/// Which vault object a reference names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalType {
    /// `system/account`, read through a checkout request
    ManagedAccount,
    /// `folder/.../title`, read directly
    Secret,
}

impl RetrievalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalType::ManagedAccount => "MANAGED_ACCOUNT",
            RetrievalType::Secret => "SECRET",
        }
    }
}

impl fmt::Display for RetrievalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrievalType {
    type Err = SafeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MANAGED_ACCOUNT" => Ok(RetrievalType::ManagedAccount),
            "SECRET" => Ok(RetrievalType::Secret),
            other => Err(SafeError::Config(format!(
                "invalid retrieval type '{}', expected MANAGED_ACCOUNT or SECRET",
                other
            ))),
        }
    }
}

/// Client credentials for the token endpoint
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    /// Base URL without trailing slash
    pub api_url: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_url: &str,
    ) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(SafeError::Config("client_id cannot be empty".to_string()));
        }
        let client_secret = Zeroizing::new(client_secret.into());
        if client_secret.is_empty() {
            return Err(SafeError::Config("client_secret cannot be empty".to_string()));
        }

        Ok(Self {
            client_id,
            client_secret,
            api_url: normalize_api_url(api_url)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Validate the API base URL and strip the trailing slash.
///
/// `https://` is required; `http://` is accepted for loopback hosts only.
fn normalize_api_url(api_url: &str) -> Result<String> {
    let trimmed = api_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| SafeError::Config(format!("invalid api_url '{}': {}", api_url, e)))?;

    match parsed.scheme() {
        "https" => {}
        "http" => {
            let loopback = matches!(
                parsed.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            );
            if !loopback {
                return Err(SafeError::Config(format!(
                    "insecure api_url rejected: {}. Only https:// is allowed \
                     (http:// is permitted for localhost/127.0.0.1 only)",
                    api_url
                )));
            }
        }
        other => {
            return Err(SafeError::Config(format!(
                "unsupported api_url scheme '{}': {}",
                other, api_url
            )))
        }
    }

    Ok(trimmed.to_string())
}

/// Bearer token for one run
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.secret())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// `system/account` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemAccountRef {
    pub system_name: String,
    pub account_name: String,
}

/// `folder/.../title` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTitleRef {
    pub folder_path: Vec<String>,
    pub title: String,
}

impl FolderTitleRef {
    /// Folder path as the vault expects it, `/`-joined
    pub fn folder(&self) -> String {
        self.folder_path.join("/")
    }
}

/// Parsed secret reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretReference {
    SystemAccount(SystemAccountRef),
    FolderTitle(FolderTitleRef),
}

/// IDs of a managed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ManagedAccount {
    #[serde(rename = "SystemId")]
    pub system_id: i64,
    #[serde(rename = "AccountId")]
    pub account_id: i64,
}

/// Secret entry type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum SecretType {
    Text,
    File,
    #[serde(other)]
    Other,
}

/// Secrets Safe listing entry
#[derive(Debug, Clone, Deserialize)]
pub struct SecretEntry {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "SecretType")]
    pub secret_type: SecretType,
    #[serde(rename = "Password", default)]
    pub password: Option<String>,
}

/// Body fields of a checkout request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub duration_minutes: u32,
    pub reason: String,
    /// `reuse` joins an existing request of the same user instead of failing
    pub conflict_option: String,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            duration_minutes: 5,
            reason: "secrets-safe retrieval".to_string(),
            conflict_option: "reuse".to_string(),
        }
    }
}
