use std::sync::Arc;

use http::{Method, StatusCode};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthManager;
use crate::clients::error::ClientError;
use crate::clients::service::ServiceContext;
use crate::utils::constants::API_TIMEOUT;

static SERVICE: &str = "state_machine";

/// Client for the state machine service. Definitions are passed through as
/// raw JSON text.
#[derive(Debug, Clone)]
pub struct StateMachineServiceClient {
    ctx: ServiceContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateMachineRef {
    pub orid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateMachineDetails {
    pub orid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub definition: Value,
}

impl StateMachineServiceClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthManager>, client: Client) -> Self {
        Self { ctx: ServiceContext::new(SERVICE, base_url, auth, client) }
    }

    pub async fn create_state_machine(&self, definition: impl Into<String>) -> Result<StateMachineRef, ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, "v1/machine", API_TIMEOUT)
            .body(definition.into());
        self.expect_ok("create_state_machine", request).await
    }

    pub async fn get_state_machine_details(&self, orid: &str) -> Result<StateMachineDetails, ClientError> {
        let request = self
            .ctx
            .json_request(Method::GET, &format!("v1/machine/{}", orid), API_TIMEOUT);
        self.expect_ok("get_state_machine_details", request).await
    }

    pub async fn update_state_machine(&self, orid: &str, definition: impl Into<String>) -> Result<StateMachineRef, ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, &format!("v1/machine/{}", orid), API_TIMEOUT)
            .body(definition.into());
        self.expect_ok("update_state_machine", request).await
    }

    pub async fn delete_state_machine(&self, orid: &str) -> Result<StateMachineRef, ClientError> {
        let request = self
            .ctx
            .json_request(Method::DELETE, &format!("v1/machine/{}", orid), API_TIMEOUT);
        self.expect_ok("delete_state_machine", request).await
    }

    // every state machine operation answers 200 with a JSON body
    async fn expect_ok<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.ctx.send(operation, request).await?;
        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }
}
