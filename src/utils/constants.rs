//! Shared constants and invariants

use std::time::Duration;

/// A cached token is handed out only while it stays valid this much longer.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 60;

/// Timeout for authentication and metadata calls.
pub const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for payload heavy calls (function invoke, code upload).
pub const LONG_API_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Separator of the `identity_url|account|user` cache key.
pub const CACHE_KEY_DELIMITER: char = '|';

/// Header carrying the bearer token on every service call.
pub const TOKEN_HEADER: &str = "Token";

pub const ACCOUNT_HEADER: &str = "Account";
