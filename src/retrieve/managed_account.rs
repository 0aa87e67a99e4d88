//! Managed account retrieval
//!
//! lookup -> create checkout request -> fetch credential -> check in.
//! Once the request exists it is always checked in, whether the fetch worked
//! or not.

use crate::api::client::{path_segment, CREDENTIALS_PATH, MANAGED_ACCOUNTS_PATH, REQUESTS_PATH};
use crate::api::types::{CheckInBody, CreateRequestBody, ManagedAccountListing, RequestId};
use crate::auth::AuthenticatedSession;
use crate::error::{Result, SafeError};
use crate::models::{CheckoutOptions, ManagedAccount, SystemAccountRef};
use tracing::{debug, info, warn};

/// Outstanding checkout request.
///
/// Consumed by [`CheckoutRequest::check_in`]; dropping it unreleased is logged
/// because the vault keeps the account locked until the request expires.
#[derive(Debug)]
pub struct CheckoutRequest {
    request_id: String,
    released: bool,
}

impl CheckoutRequest {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            released: false,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Release the lock. Attempted once; any 2xx counts as released.
    pub async fn check_in(mut self, session: &AuthenticatedSession, reason: &str) -> Result<()> {
        let path = format!("{}/{}/checkin", REQUESTS_PATH, path_segment(&self.request_id));
        let response = session.put_json(&path, &CheckInBody { reason }).await;
        self.released = true;
        let response = response?;

        if !response.status.is_success() {
            return Err(SafeError::CheckIn {
                status: response.status_code(),
                message: response.body,
                request_id: self.request_id.clone(),
            });
        }

        debug!(request_id = %self.request_id, "request checked in");
        Ok(())
    }
}

impl Drop for CheckoutRequest {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                request_id = %self.request_id,
                "checkout request dropped without check-in"
            );
        }
    }
}

/// Reads managed account credentials through checkout requests
pub struct ManagedAccountRetriever<'a> {
    session: &'a AuthenticatedSession,
    options: &'a CheckoutOptions,
}

impl<'a> ManagedAccountRetriever<'a> {
    pub fn new(session: &'a AuthenticatedSession, options: &'a CheckoutOptions) -> Self {
        Self { session, options }
    }

    pub async fn retrieve(&self, reference: &SystemAccountRef) -> Result<String> {
        let account = self.lookup(reference).await?;
        let checkout = self.create_request(reference, &account).await?;

        let fetched = self.fetch_credential(&checkout).await;
        let request_id = checkout.request_id().to_string();
        let released = checkout.check_in(self.session, &self.options.reason).await;

        match (fetched, released) {
            (Ok(credential), Ok(())) => {
                info!(
                    system = %reference.system_name,
                    account = %reference.account_name,
                    "managed account credential retrieved"
                );
                Ok(credential)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(check_in_error)) => {
                warn!(
                    request_id = %request_id,
                    error = %check_in_error,
                    "check-in failed after credential fetch failure"
                );
                Err(e)
            }
        }
    }

    /// Resolve system and account names to their IDs.
    pub async fn lookup(&self, reference: &SystemAccountRef) -> Result<ManagedAccount> {
        debug!(
            system = %reference.system_name,
            account = %reference.account_name,
            "looking up managed account"
        );
        let response = self
            .session
            .get(
                MANAGED_ACCOUNTS_PATH,
                &[
                    ("systemName", reference.system_name.as_str()),
                    ("accountName", reference.account_name.as_str()),
                ],
            )
            .await?;

        let status = response.status_code();
        let lookup_error = |message: String| SafeError::ManagedAccountLookup {
            message,
            status,
            system_name: reference.system_name.clone(),
            account_name: reference.account_name.clone(),
        };

        if !response.is_ok() {
            return Err(lookup_error(response.body));
        }

        let mut accounts = response
            .json::<ManagedAccountListing>()
            .map_err(lookup_error)?
            .into_vec();

        match accounts.len() {
            1 => Ok(accounts.remove(0)),
            0 => Err(lookup_error("no managed account matched".to_string())),
            n => Err(lookup_error(format!(
                "{} managed accounts matched, expected exactly one",
                n
            ))),
        }
    }

    async fn create_request(
        &self,
        reference: &SystemAccountRef,
        account: &ManagedAccount,
    ) -> Result<CheckoutRequest> {
        let response = self
            .session
            .post_json(REQUESTS_PATH, &CreateRequestBody::new(account, self.options))
            .await?;

        let status = response.status_code();
        let request_error = |message: String| SafeError::CheckoutRequest {
            message,
            status,
            system_name: reference.system_name.clone(),
            account_name: reference.account_name.clone(),
        };

        if !response.status.is_success() {
            return Err(request_error(response.body));
        }

        let request_id = response
            .json::<RequestId>()
            .map_err(request_error)?
            .into_string();
        debug!(request_id = %request_id, "checkout request created");
        Ok(CheckoutRequest::new(request_id))
    }

    async fn fetch_credential(&self, checkout: &CheckoutRequest) -> Result<String> {
        let path = format!("{}/{}", CREDENTIALS_PATH, path_segment(checkout.request_id()));
        let response = self.session.get(&path, &[]).await?;

        if !response.is_ok() {
            return Err(SafeError::CredentialFetch {
                status: response.status_code(),
                message: response.body,
                request_id: checkout.request_id().to_string(),
            });
        }
        Ok(response.body)
    }
}
