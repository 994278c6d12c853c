use std::sync::Arc;
use std::time::Duration;

use http::{header::CONTENT_TYPE, Method, StatusCode};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::AuthManager;
use crate::clients::error::ClientError;
use crate::helpers::http::join_url;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::TOKEN_HEADER;

/// Fully read response of one service call.
#[derive(Debug)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Error for a status the operation does not handle.
    pub fn unexpected(&self) -> ClientError {
        ClientError::Api {
            status: self.status.as_u16(),
            body: self.text(),
        }
    }
}

/// Plumbing shared by all service clients: base url, token source and
/// HTTP client.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    service: &'static str,
    base_url: String,
    auth: Arc<AuthManager>,
    client: Client,
}

impl ServiceContext {
    pub fn new(service: &'static str, base_url: impl Into<String>, auth: Arc<AuthManager>, client: Client) -> Self {
        Self {
            service,
            base_url: base_url.into(),
            auth,
            client,
        }
    }

    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Request under the service base url with the given timeout.
    pub fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        self.client
            .request(method, join_url(&self.base_url, path))
            .timeout(timeout)
    }

    /// Same as [`request`](Self::request), with a JSON content type.
    pub fn json_request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        self.request(method, path, timeout)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Attach a token from the auth manager, then send.
    pub async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<ServiceResponse, ClientError> {
        let token = self.auth.get_token(None).await?;
        self.execute(operation, request.header(TOKEN_HEADER, token)).await
    }

    /// Send without a token, for the few public endpoints.
    pub async fn send_anonymous(&self, operation: &'static str, request: RequestBuilder) -> Result<ServiceResponse, ClientError> {
        self.execute(operation, request).await
    }

    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> Result<ServiceResponse, ClientError> {
        let metrics = get_metrics().await;
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics.service_requests.with_label_values(&[self.service, operation, "transport"]).inc();
                return Err(e.into());
            }
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) => {
                metrics.service_requests.with_label_values(&[self.service, operation, "transport"]).inc();
                return Err(e.into());
            }
        };

        metrics.service_requests.with_label_values(&[self.service, operation, status.as_str()]).inc();
        debug!(service = self.service, operation, status = status.as_u16(), "service call finished");
        Ok(ServiceResponse { status, body })
    }
}
