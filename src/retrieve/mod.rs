//! Per-reference retrievers
//!
//! Both borrow the run's `AuthenticatedSession`; neither keeps state between
//! references.

pub mod managed_account;
pub mod secret;

pub use managed_account::{CheckoutRequest, ManagedAccountRetriever};
pub use secret::SecretRetriever;
