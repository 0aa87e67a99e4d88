//! Secrets Safe retrieval client
//!
//! Authenticates against a Password Safe API with OAuth client credentials,
//! signs in, and reads either managed account credentials (through a
//! checkout/check-in request) or Secrets Safe text and file secrets.
//!
//! ```no_run
//! use secrets_safe::{Credentials, RetrievalType};
//!
//! # async fn demo() -> secrets_safe::Result<()> {
//! let credentials = Credentials::new(
//!     "client-id",
//!     "client-secret",
//!     "https://vault.example.com/BeyondTrust/api/public/v3/",
//! )?;
//! let values = secrets_safe::run(&["linux01/root"], RetrievalType::ManagedAccount, credentials).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod path;
pub mod retrieve;

pub use error::{Result, SafeError};
pub use models::{CheckoutOptions, Credentials, RetrievalType};
pub use orchestrator::{run, RetrievalOrchestrator};
