//! Error types
//!
//! Every failure is terminal for a retrieval run. API variants carry the status
//! code and the body text the vault answered with.

use thiserror::Error;

/// Retrieval error
#[derive(Error, Debug)]
pub enum SafeError {
    #[error("Error getting token, message: {message}, statuscode: {status}")]
    Authentication { message: String, status: u16 },

    #[error("Error signing in, message: {message}, statuscode: {status}")]
    Session { message: String, status: u16 },

    #[error("Invalid {kind} path: {reference}, check your {halves} separator")]
    InvalidPath {
        kind: &'static str,
        reference: String,
        halves: &'static str,
    },

    #[error(
        "Error getting the manage account, message: {message}, statuscode: {status}, \
         system name: {system_name}, managed account name: {account_name}"
    )]
    ManagedAccountLookup {
        message: String,
        status: u16,
        system_name: String,
        account_name: String,
    },

    #[error(
        "Error creating the request, message: {message}, statuscode: {status}, \
         system name: {system_name}, managed account name: {account_name}"
    )]
    CheckoutRequest {
        message: String,
        status: u16,
        system_name: String,
        account_name: String,
    },

    #[error(
        "Error getting the credential by request id, message: {message}, \
         statuscode: {status}, request id: {request_id}"
    )]
    CredentialFetch {
        message: String,
        status: u16,
        request_id: String,
    },

    #[error(
        "Error checking in the request, message: {message}, statuscode: {status}, \
         request id: {request_id}"
    )]
    CheckIn {
        message: String,
        status: u16,
        request_id: String,
    },

    #[error(
        "Error getting the secret by path, message: {message}, statuscode: {status}, \
         path: {path}, title: {title}"
    )]
    SecretLookup {
        message: String,
        status: u16,
        path: String,
        title: String,
    },

    #[error(
        "Error getting the file by id, message: {message}, statuscode: {status}, \
         secret id: {secret_id}"
    )]
    FileRetrieval {
        message: String,
        status: u16,
        secret_id: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SafeError {
    /// HTTP status the vault answered with, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            SafeError::Authentication { status, .. }
            | SafeError::Session { status, .. }
            | SafeError::ManagedAccountLookup { status, .. }
            | SafeError::CheckoutRequest { status, .. }
            | SafeError::CredentialFetch { status, .. }
            | SafeError::CheckIn { status, .. }
            | SafeError::SecretLookup { status, .. }
            | SafeError::FileRetrieval { status, .. } => Some(*status),
            SafeError::Http(e) => e.status().map(|s| s.as_u16()),
            SafeError::InvalidPath { .. } | SafeError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SafeError>;
