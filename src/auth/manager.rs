use std::sync::Arc;

use http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info, warn};

use crate::auth::claims::decode_claims;
use crate::auth::credentials::{CredentialOverrides, Credentials};
use crate::auth::error::AuthError;
use crate::cache::{CredentialCache, InMemoryCache};
use crate::helpers::http::{build_client, join_url};
use crate::helpers::time::{get_instant, now_i64};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{API_TIMEOUT, CACHE_KEY_DELIMITER, TOKEN_SAFETY_MARGIN_SECS};

static OK_MSG: &str = "ok";
static ERROR_MSG: &str = "error";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateRequest<'a> {
    account_id: &'a str,
    user_id: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthenticateResponse {
    token: String,
}

/// Hands out tokens for MDS Cloud calls, reusing cached ones while they are
/// still valid.
///
/// One manager is shared by every client created from the same
/// [`Sdk`](crate::Sdk). When the gate is enabled, token acquisition runs one
/// call at a time per gate; waiting callers then run the full lookup
/// themselves, so they usually find the token the first caller stored.
#[derive(Debug)]
pub struct AuthManager<C = InMemoryCache<String>> {
    cache: C,
    identity_url: String,
    defaults: Credentials,
    client: Client,
    gate: Option<Arc<Semaphore>>,
}

impl AuthManager<InMemoryCache<String>> {
    pub fn new(
        identity_url: impl Into<String>,
        defaults: Credentials,
        allow_self_sign_cert: bool,
        enable_semaphore: bool,
    ) -> Result<Self, AuthError> {
        Self::with_cache(InMemoryCache::new(), identity_url, defaults, allow_self_sign_cert, enable_semaphore)
    }
}

impl<C> AuthManager<C>
where
    C: CredentialCache<String>,
{
    pub fn with_cache(
        cache: C,
        identity_url: impl Into<String>,
        defaults: Credentials,
        allow_self_sign_cert: bool,
        enable_semaphore: bool,
    ) -> Result<Self, AuthError> {
        let client = build_client(allow_self_sign_cert)?;
        Ok(Self {
            cache,
            identity_url: identity_url.into().trim_end_matches('/').to_owned(),
            defaults,
            client,
            gate: enable_semaphore.then(|| Arc::new(Semaphore::new(1))),
        })
    }

    /// Use `gate` to serialize acquisition, e.g. to share one gate between
    /// several managers.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn gate(&self) -> Option<&Arc<Semaphore>> {
        self.gate.as_ref()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn account(&self) -> &str {
        &self.defaults.account
    }

    /// Return a valid token for the default credentials, or for `overrides`
    /// where given.
    pub async fn get_token(&self, overrides: Option<&CredentialOverrides>) -> Result<String, AuthError> {
        // released on drop, error paths included
        let _permit = self.enter_gate().await?;
        self.get_token_work(overrides).await
    }

    /// Drop the cached token for the resolved credentials.
    pub async fn invalidate(&self, overrides: Option<&CredentialOverrides>) -> Result<(), AuthError> {
        let credentials = self.defaults.resolve(overrides);
        let key = self.cache_key(&credentials)?;
        self.cache.remove(&key).await;
        Ok(())
    }

    /// Drop every cached token.
    pub async fn clear(&self) {
        self.cache.remove_all().await;
    }

    async fn enter_gate(&self) -> Result<Option<SemaphorePermit<'_>>, AuthError> {
        let Some(gate) = &self.gate else {
            return Ok(None);
        };
        let start = get_instant();
        let permit = gate
            .acquire()
            .await
            .map_err(|_| AuthError::RequestBuild("authentication gate is closed".to_owned()))?;
        get_metrics().await.auth_gate_wait.observe(start.elapsed().as_secs_f64());
        Ok(Some(permit))
    }

    async fn get_token_work(&self, overrides: Option<&CredentialOverrides>) -> Result<String, AuthError> {
        let metrics = get_metrics().await;
        let credentials = self.defaults.resolve(overrides);
        let key = self.cache_key(&credentials)?;

        if let Some(token) = self.cache.get(&key).await {
            let claims = decode_claims(&token)?;
            if claims.is_fresh(now_i64(), TOKEN_SAFETY_MARGIN_SECS) {
                debug!(account = %credentials.account, user = %credentials.user_id, "token served from cache");
                metrics.token_cache_hits.inc();
                return Ok(token);
            }
            debug!(account = %credentials.account, user = %credentials.user_id, expires_at = claims.expires_at(), "cached token is stale");
            metrics.token_cache_stale.inc();
            self.cache.remove(&key).await;
        }

        let start = get_instant();
        let result = self.fetch_new_token(&credentials).await;
        metrics.token_acquisition_duration.observe(start.elapsed().as_secs_f64());

        match result {
            Ok(token) => {
                metrics.token_acquisitions.with_label_values(&[OK_MSG]).inc();
                info!(account = %credentials.account, user = %credentials.user_id, "acquired new token");
                self.cache.set(&key, token.clone()).await;
                Ok(token)
            }
            Err(e) => {
                metrics.token_acquisitions.with_label_values(&[ERROR_MSG]).inc();
                Err(e)
            }
        }
    }

    /// `identity_url|account|user`. The delimiter is not escaped, so it is
    /// refused inside any of the parts.
    fn cache_key(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let parts = [
            ("identity url", self.identity_url.as_str()),
            ("account", credentials.account.as_str()),
            ("user id", credentials.user_id.as_str()),
        ];
        for (name, value) in parts {
            if value.contains(CACHE_KEY_DELIMITER) {
                return Err(AuthError::RequestBuild(format!(
                    "{} must not contain '{}'",
                    name, CACHE_KEY_DELIMITER
                )));
            }
        }
        Ok(format!(
            "{}{d}{}{d}{}",
            self.identity_url,
            credentials.account,
            credentials.user_id,
            d = CACHE_KEY_DELIMITER
        ))
    }

    async fn fetch_new_token(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let url = join_url(&self.identity_url, "v1/authenticate");
        let body = AuthenticateRequest {
            account_id: &credentials.account,
            user_id: &credentials.user_id,
            password: &credentials.password,
        };

        let response = self
            .client
            .post(&url)
            .timeout(API_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), url = %url, "authentication rejected");
            return Err(AuthError::Api { status: status.as_u16(), body: text });
        }

        serde_json::from_str::<AuthenticateResponse>(&text)
            .map(|payload| payload.token)
            .map_err(|e| AuthError::Decode(format!("could not decode authentication response: {}", e)))
    }
}
