use std::sync::Arc;

use http::{Method, StatusCode};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::AuthManager;
use crate::clients::error::ClientError;
use crate::clients::service::ServiceContext;
use crate::utils::constants::API_TIMEOUT;

static SERVICE: &str = "file";

/// Client for the file (container) service.
#[derive(Debug, Clone)]
pub struct FileServiceClient {
    ctx: ServiceContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContainerResult {
    pub orid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerContents {
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Serialize)]
struct DeletePayload<'a> {
    orid: &'a str,
}

impl FileServiceClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthManager>, client: Client) -> Self {
        Self { ctx: ServiceContext::new(SERVICE, base_url, auth, client) }
    }

    /// Fails with [`ClientError::AlreadyExists`] when the name is taken.
    pub async fn create_container(&self, name: &str) -> Result<CreateContainerResult, ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, &format!("v1/createContainer/{}", name), API_TIMEOUT);
        let response = self.ctx.send("create_container", request).await?;

        match response.status {
            StatusCode::CREATED => response.json(),
            StatusCode::CONFLICT => Err(ClientError::AlreadyExists(format!("container {}", name))),
            _ => Err(response.unexpected()),
        }
    }

    pub async fn list_container_contents(&self, orid: &str) -> Result<ContainerContents, ClientError> {
        let request = self
            .ctx
            .json_request(Method::GET, &format!("v1/list/{}", orid), API_TIMEOUT);
        let response = self.ctx.send("list_container_contents", request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }

    /// `orid` may point at a whole container or a path inside one.
    pub async fn delete_container_or_path(&self, orid: &str) -> Result<(), ClientError> {
        let request = self
            .ctx
            .json_request(Method::DELETE, &format!("v1/{}", orid), API_TIMEOUT)
            .json(&DeletePayload { orid });
        let response = self.ctx.send("delete_container_or_path", request).await?;

        match response.status {
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(response.unexpected()),
        }
    }
}
