//! # MDS Cloud SDK
//!
//! Typed clients for the MDS Cloud services, sharing one token manager
//! that caches identity tokens until shortly before they expire.
//!
//! Modules:
//! - `auth`: token acquisition manager, claims decoding, credentials
//! - `cache`: credential cache trait and in-memory implementation
//! - `clients`: identity, queue, file, serverless functions, state machine
//! - `config`: SDK configuration and YAML loader
//! - `observability`: prometheus metrics

pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod helpers;
pub mod observability;
pub mod sdk;
pub mod utils;
#[cfg(test)]
pub mod tests;


pub use crate::auth::{AuthError, AuthManager, CredentialOverrides, Credentials};
pub use crate::clients::ClientError;
pub use crate::config::settings::{SdkConfig, ServiceUrls};
pub use crate::sdk::Sdk;
