//! Retrieval run
//!
//! token -> sign in -> one retriever call per reference, in input order -> sign
//! out. The batch is all-or-nothing: the first failing reference aborts the run
//! and no values are returned.

use crate::api::build_http_client;
use crate::auth::{AuthenticatedSession, SessionClient, TokenProvider};
use crate::error::{Result, SafeError};
use crate::models::{CheckoutOptions, Credentials, RetrievalType, SecretReference};
use crate::path;
use crate::retrieve::{ManagedAccountRetriever, SecretRetriever};
use tracing::{debug, info, warn};

/// Drives one retrieval run for a set of references.
pub struct RetrievalOrchestrator {
    credentials: Credentials,
    options: CheckoutOptions,
    http: Option<reqwest::Client>,
}

impl RetrievalOrchestrator {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            options: CheckoutOptions::default(),
            http: None,
        }
    }

    #[must_use]
    pub fn with_checkout_options(mut self, options: CheckoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a caller-built client instead of [`build_http_client`].
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Resolve every reference, returning values in input order.
    pub async fn run<S: AsRef<str>>(
        &self,
        references: &[S],
        retrieval_type: RetrievalType,
    ) -> Result<Vec<String>> {
        if references.is_empty() {
            return Err(SafeError::Config("no secret references supplied".to_string()));
        }

        let http = match &self.http {
            Some(http) => http.clone(),
            None => build_http_client()?,
        };

        info!(
            count = references.len(),
            retrieval_type = %retrieval_type,
            "starting retrieval run"
        );
        let token = TokenProvider::new(http.clone())
            .acquire(&self.credentials)
            .await?;
        let session = SessionClient::new(http, self.credentials.api_url.clone())
            .sign_in(token)
            .await?;

        let result = self
            .retrieve_all(&session, references, retrieval_type)
            .await;

        if let Err(e) = session.sign_out().await {
            warn!(error = %e, "sign out failed");
        }

        result
    }

    async fn retrieve_all<S: AsRef<str>>(
        &self,
        session: &AuthenticatedSession,
        references: &[S],
        retrieval_type: RetrievalType,
    ) -> Result<Vec<String>> {
        let mut values = Vec::with_capacity(references.len());

        for (index, reference) in references.iter().enumerate() {
            debug!(index, reference = reference.as_ref(), "resolving reference");
            let value = match path::parse(reference.as_ref(), retrieval_type)? {
                SecretReference::SystemAccount(account) => {
                    ManagedAccountRetriever::new(session, &self.options)
                        .retrieve(&account)
                        .await?
                }
                SecretReference::FolderTitle(secret) => {
                    SecretRetriever::new(session).retrieve(&secret).await?
                }
            };
            values.push(value);
        }

        Ok(values)
    }
}

/// One-shot run with default checkout options.
pub async fn run<S: AsRef<str>>(
    references: &[S],
    retrieval_type: RetrievalType,
    credentials: Credentials,
) -> Result<Vec<String>> {
    RetrievalOrchestrator::new(credentials)
        .run(references, retrieval_type)
        .await
}
