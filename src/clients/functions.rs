use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthManager;
use crate::clients::error::ClientError;
use crate::clients::service::ServiceContext;
use crate::utils::constants::{ACCOUNT_HEADER, API_TIMEOUT, LONG_API_TIMEOUT};

static SERVICE: &str = "serverless_functions";

/// Client for the serverless functions service.
///
/// Besides the token, every call carries the manager's default account in the
/// `Account` header.
#[derive(Debug, Clone)]
pub struct ServerlessFunctionsClient {
    ctx: ServiceContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionSummary {
    pub orid: String,
    pub name: String,
}

/// Missing fields come back as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionDetails {
    pub orid: String,
    pub name: String,
    pub version: String,
    pub runtime: String,
    pub entry_point: String,
    pub created: String,
    pub last_update: String,
    pub last_invoke: String,
}

#[derive(Serialize)]
struct CreateFunctionPayload<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateFunctionResponse {
    orid: String,
}

impl ServerlessFunctionsClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthManager>, client: Client) -> Self {
        Self { ctx: ServiceContext::new(SERVICE, base_url, auth, client) }
    }

    fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        self.ctx
            .json_request(method, path, timeout)
            .header(ACCOUNT_HEADER, self.ctx.auth().account())
    }

    pub async fn create_function(&self, name: &str) -> Result<FunctionSummary, ClientError> {
        let request = self
            .request(Method::POST, "v1/create", API_TIMEOUT)
            .json(&CreateFunctionPayload { name });
        let response = self.ctx.send("create_function", request).await?;

        match response.status {
            StatusCode::CREATED => {
                let created: CreateFunctionResponse = response.json()?;
                Ok(FunctionSummary { orid: created.orid, name: name.to_owned() })
            }
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(response.text())),
            StatusCode::CONFLICT => Err(ClientError::AlreadyExists(format!("function with name \"{}\"", name))),
            _ => Err(response.unexpected()),
        }
    }

    pub async fn list_functions(&self) -> Result<Vec<FunctionSummary>, ClientError> {
        let request = self.request(Method::GET, "v1/list", API_TIMEOUT);
        let response = self.ctx.send("list_functions", request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }

    pub async fn delete_function(&self, orid: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("v1/{}", orid), API_TIMEOUT);
        let response = self.ctx.send("delete_function", request).await?;

        match response.status {
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(response.unexpected()),
        }
    }

    /// Run the function with `body` as input and return its raw output.
    pub async fn invoke_function(&self, orid: &str, body: &Value) -> Result<Vec<u8>, ClientError> {
        let request = self
            .request(Method::POST, &format!("v1/invoke/{}", orid), LONG_API_TIMEOUT)
            .json(body);
        let response = self.ctx.send("invoke_function", request).await?;

        match response.status {
            StatusCode::OK => Ok(response.body),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(response.text())),
            _ => Err(response.unexpected()),
        }
    }

    pub async fn get_function_details(&self, orid: &str) -> Result<FunctionDetails, ClientError> {
        let request = self.request(Method::GET, &format!("v1/inspect/{}", orid), API_TIMEOUT);
        let response = self.ctx.send("get_function_details", request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }

    /// Upload a source archive as the new code of the function.
    pub async fn update_function_code(
        &self,
        orid: &str,
        runtime: &str,
        entry_point: &str,
        source_archive: impl AsRef<Path>,
    ) -> Result<(), ClientError> {
        let path = source_archive.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "source.zip".to_owned());
        info!(orid, file = %file_name, size = content.len(), "uploading function code");

        let form = Form::new()
            .part("sourceArchive", Part::bytes(content).file_name(file_name))
            .text("runtime", runtime.to_owned())
            .text("entryPoint", entry_point.to_owned());

        // multipart sets its own content type
        let request = self
            .ctx
            .request(Method::POST, &format!("v1/uploadCode/{}", orid), LONG_API_TIMEOUT)
            .header(ACCOUNT_HEADER, self.ctx.auth().account())
            .multipart(form);
        let response = self.ctx.send("update_function_code", request).await?;

        match response.status {
            StatusCode::CREATED => Ok(()),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(response.text())),
            _ => Err(response.unexpected()),
        }
    }
}
