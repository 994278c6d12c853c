use std::sync::Arc;

use http::{Method, StatusCode};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthManager, CredentialOverrides};
use crate::clients::error::ClientError;
use crate::clients::service::ServiceContext;
use crate::utils::constants::API_TIMEOUT;

static SERVICE: &str = "identity";

/// Client for the identity service.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    ctx: ServiceContext,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountArgs {
    pub user_id: String,
    pub email: String,
    pub password: String,
    pub friendly_name: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResult {
    pub status: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthenticateArgs {
    pub account_id: String,
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateResult {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonateUserArgs {
    pub account_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImpersonateUserResult {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicSignatureResponse {
    pub signature: String,
}

impl IdentityClient {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthManager>, client: Client) -> Self {
        Self { ctx: ServiceContext::new(SERVICE, base_url, auth, client) }
    }

    /// Register a new account. Needs no token.
    pub async fn register(&self, args: &RegisterAccountArgs) -> Result<RegisterResult, ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, "v1/register", API_TIMEOUT)
            .json(args);
        let response = self.ctx.send_anonymous("register", request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }

    /// Authenticate through the shared auth manager, so the token is cached
    /// for these credentials.
    pub async fn authenticate(&self, args: &AuthenticateArgs) -> Result<AuthenticateResult, ClientError> {
        let overrides = CredentialOverrides {
            account: Some(args.account_id.clone()),
            user_id: Some(args.user_id.clone()),
            password: Some(args.password.clone()),
        };
        let token = self.ctx.auth().get_token(Some(&overrides)).await?;
        Ok(AuthenticateResult { token })
    }

    pub async fn update_user(&self, args: &UpdateUserArgs) -> Result<(), ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, "v1/updateUser", API_TIMEOUT)
            .json(args);
        let response = self.ctx.send("update_user", request).await?;

        match response.status {
            StatusCode::OK => Ok(()),
            _ => Err(response.unexpected()),
        }
    }

    /// Token acting as the current user on another account.
    pub async fn impersonate_user(&self, args: &ImpersonateUserArgs) -> Result<ImpersonateUserResult, ClientError> {
        let request = self
            .ctx
            .json_request(Method::POST, "v1/impersonate", API_TIMEOUT)
            .json(args);
        let response = self.ctx.send("impersonate_user", request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }

    pub async fn get_public_signature(&self) -> Result<PublicSignatureResponse, ClientError> {
        let request = self
            .ctx
            .json_request(Method::GET, "v1/publicSignature", API_TIMEOUT);
        let response = self.ctx.send_anonymous("get_public_signature", request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.unexpected()),
        }
    }
}
