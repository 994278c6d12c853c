use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

use crate::auth::error::AuthError;

/// Claims read from a token payload. Only `exp` matters to the cache.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Seconds since epoch, may carry a fractional part.
    pub exp: f64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> i64 {
        self.exp.floor() as i64
    }

    /// True while `now + margin` is still before the expiration.
    pub fn is_fresh(&self, now: i64, margin_seconds: i64) -> bool {
        now + margin_seconds < self.expires_at()
    }
}

/// Decode the payload segment of a compact signed token.
///
/// The signature is NOT verified. The identity service already checked it
/// when it issued the token; this only peeks at the expiry locally.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Decode(format!(
            "invalid token format: expected 3 segments, got {}",
            parts.len()
        )));
    }

    let payload = parts[1];
    let decoded = if payload.ends_with('=') {
        URL_SAFE.decode(payload)
    } else {
        URL_SAFE_NO_PAD.decode(payload)
    }
    .map_err(|e| AuthError::Decode(format!("base64 decode error: {}", e)))?;

    serde_json::from_slice::<TokenClaims>(&decoded)
        .map_err(|e| AuthError::Decode(format!("invalid token payload: {}", e)))
}
