//! Vault API wire types
//!
//! One decode target per endpoint. Raw-text endpoints (credential, file
//! download) are read straight from `ApiResponse::body`.

use crate::models::{CheckoutOptions, ManagedAccount};
use serde::{Deserialize, Serialize};

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Managed account lookup response.
///
/// Filtering by both names usually yields a single object; some API versions
/// wrap it in an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManagedAccountListing {
    One(ManagedAccount),
    Many(Vec<ManagedAccount>),
}

impl ManagedAccountListing {
    pub fn into_vec(self) -> Vec<ManagedAccount> {
        match self {
            ManagedAccountListing::One(account) => vec![account],
            ManagedAccountListing::Many(accounts) => accounts,
        }
    }
}

/// Checkout request body
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequestBody<'a> {
    #[serde(rename = "SystemID")]
    pub system_id: i64,
    #[serde(rename = "AccountID")]
    pub account_id: i64,
    #[serde(rename = "DurationMinutes")]
    pub duration_minutes: u32,
    #[serde(rename = "Reason")]
    pub reason: &'a str,
    #[serde(rename = "ConflictOption")]
    pub conflict_option: &'a str,
}

impl<'a> CreateRequestBody<'a> {
    pub fn new(account: &ManagedAccount, options: &'a CheckoutOptions) -> Self {
        Self {
            system_id: account.system_id,
            account_id: account.account_id,
            duration_minutes: options.duration_minutes,
            reason: &options.reason,
            conflict_option: &options.conflict_option,
        }
    }
}

/// Checkout request id, returned as a bare JSON number or string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    Text(String),
}

impl RequestId {
    pub fn into_string(self) -> String {
        match self {
            RequestId::Number(n) => n.to_string(),
            RequestId::Text(s) => s,
        }
    }
}

/// Check-in body
#[derive(Debug, Clone, Serialize)]
pub struct CheckInBody<'a> {
    #[serde(rename = "Reason")]
    pub reason: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_ignores_unused_fields() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token": "my_token", "token_type": "Bearer", "expires_in": 3600}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "my_token");
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn listing_accepts_object_or_array() {
        let one: ManagedAccountListing =
            serde_json::from_str(r#"{"SystemId": 1, "AccountId": 2}"#).unwrap();
        assert_eq!(
            one.into_vec(),
            vec![ManagedAccount { system_id: 1, account_id: 2 }]
        );

        let many: ManagedAccountListing =
            serde_json::from_str(r#"[{"SystemId": 1, "AccountId": 2}, {"SystemId": 3, "AccountId": 4}]"#)
                .unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn request_id_accepts_number_or_string() {
        let text: RequestId = serde_json::from_str(r#""123""#).unwrap();
        assert_eq!(text.into_string(), "123");
        let number: RequestId = serde_json::from_str("456").unwrap();
        assert_eq!(number.into_string(), "456");
    }

    #[test]
    fn create_request_body_uses_vault_field_names() {
        let options = CheckoutOptions::default();
        let account = ManagedAccount { system_id: 7, account_id: 9 };
        let body = serde_json::to_value(CreateRequestBody::new(&account, &options)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "SystemID": 7,
                "AccountID": 9,
                "DurationMinutes": 5,
                "Reason": "secrets-safe retrieval",
                "ConflictOption": "reuse"
            })
        );
    }
}
