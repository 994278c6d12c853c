use std::sync::Arc;

use http::{Method, StatusCode};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::AuthManager;
use crate::clients::error::ClientError;
use crate::clients::service::ServiceContext;
use crate::utils::constants::API_TIMEOUT;

static SERVICE: &str = "queue";

/// Value of an update field that clears it on the service side.
pub const CLEAR_FIELD: &str = "NULL";

pub const STATUS_CREATED: &str = "created";
pub const STATUS_EXISTS: &str = "exists";

/// Client for the queue service.
#[derive(Debug, Clone)]
pub struct QueueServiceClient {
    ctx: ServiceContext,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateQueueArgs {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dlq: Option<String>,
}

/// `status` is [`STATUS_CREATED`] for a new queue and [`STATUS_EXISTS`] when
/// a queue with that name was already there.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQueueResult {
    #[serde(default)]
    pub status: String,
    pub name: String,
    pub orid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueDetails {
    #[serde(default)]
    pub orid: String,
    pub resource: Option<String>,
    pub dlq: Option<String>,
}

/// `None` leaves a field untouched, [`CLEAR_FIELD`] clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateQueueArgs {
    pub orid: String,
    pub resource: Option<String>,
    pub dlq: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateQueuePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dlq: Option<&'a str>,
}

fn update_value(value: Option<&str>) -> Option<&str> {
    value.map(|v| if v == CLEAR_FIELD { "" } else { v })
}

impl QueueServiceClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthManager>, client: Client) -> Self {
        Self { ctx: ServiceContext::new(SERVICE, base_url, auth, client) }
    }

    pub async fn create_queue(&self, args: &CreateQueueArgs) -> Result<CreateQueueResult, ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, "v1/queue", API_TIMEOUT)
            .json(args);
        let response = self.ctx.send("create_queue", request).await?;

        let status = match response.status {
            StatusCode::OK => STATUS_EXISTS,
            StatusCode::CREATED => STATUS_CREATED,
            _ => return Err(response.unexpected()),
        };
        let mut result: CreateQueueResult = response.json()?;
        result.status = status.to_owned();
        Ok(result)
    }

    pub async fn delete_queue(&self, orid: &str) -> Result<(), ClientError> {
        let request = self
            .ctx
            .json_request(Method::DELETE, &format!("v1/queue/{}", orid), API_TIMEOUT);
        let response = self.ctx.send("delete_queue", request).await?;

        match response.status {
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(response.unexpected()),
        }
    }

    pub async fn get_queue_details(&self, orid: &str) -> Result<QueueDetails, ClientError> {
        let request = self
            .ctx
            .json_request(Method::GET, &format!("v1/queue/{}/details", orid), API_TIMEOUT);
        let response = self.ctx.send("get_queue_details", request).await?;

        match response.status {
            StatusCode::OK => {
                let mut details: QueueDetails = response.json()?;
                details.orid = orid.to_owned();
                Ok(details)
            }
            _ => Err(response.unexpected()),
        }
    }

    pub async fn update_queue(&self, args: &UpdateQueueArgs) -> Result<(), ClientError> {
        let payload = UpdateQueuePayload {
            resource: update_value(args.resource.as_deref()),
            dlq: update_value(args.dlq.as_deref()),
        };
        let request = self
            .ctx
            .json_request(Method::POST, &format!("v1/queue/{}", args.orid), API_TIMEOUT)
            .json(&payload);
        let response = self.ctx.send("update_queue", request).await?;

        match response.status {
            StatusCode::OK => Ok(()),
            _ => Err(response.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_clears_null_and_omits_absent() {
        let payload = UpdateQueuePayload {
            resource: update_value(Some(CLEAR_FIELD)),
            dlq: update_value(None),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "resource": "" }));
    }

    #[test]
    fn create_args_omit_optional_fields() {
        let args = CreateQueueArgs { name: "q".into(), ..Default::default() };
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "q" }));
    }
}
