//! Authentication
//!
//! Client-credentials token exchange followed by the API sign-in.

pub mod session;
pub mod token;

pub use session::{AuthenticatedSession, SessionClient};
pub use token::TokenProvider;
