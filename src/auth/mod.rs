//! Token acquisition and caching for calls against MDS Cloud services.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod manager;

pub use claims::{decode_claims, TokenClaims};
pub use credentials::{CredentialOverrides, Credentials};
pub use error::AuthError;
pub use manager::AuthManager;
