use std::sync::Arc;

use reqwest::Client;
use tracing::debug;

use crate::auth::{AuthManager, Credentials};
use crate::clients::{
    ClientError, FileServiceClient, IdentityClient, QueueServiceClient, ServerlessFunctionsClient,
    StateMachineServiceClient,
};
use crate::config::settings::{SdkConfig, ServiceUrls};
use crate::helpers::http::build_client;

/// Entry point of the SDK: owns one [`AuthManager`] and hands out clients that
/// share it.
#[derive(Debug, Clone)]
pub struct Sdk {
    urls: ServiceUrls,
    auth_manager: Arc<AuthManager>,
    // identity calls honour `allow_self_sign_cert`, other services do not
    identity_http: Client,
    service_http: Client,
}

impl Sdk {
    pub fn new(config: SdkConfig) -> Result<Self, ClientError> {
        let config = config.normalize().map_err(ClientError::RequestBuild)?;
        let auth_manager = AuthManager::new(
            config.urls.identity_url.clone(),
            Credentials::new(config.account, config.user_id, config.password),
            config.allow_self_sign_cert,
            config.enable_auth_semaphore,
        )?;
        debug!(
            identity_url = %config.urls.identity_url,
            gate = config.enable_auth_semaphore,
            "sdk initialised"
        );

        Ok(Self {
            urls: config.urls,
            auth_manager: Arc::new(auth_manager),
            identity_http: build_client(config.allow_self_sign_cert)?,
            service_http: build_client(false)?,
        })
    }

    pub fn auth_manager(&self) -> &Arc<AuthManager> {
        &self.auth_manager
    }

    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    pub fn identity_client(&self) -> IdentityClient {
        IdentityClient::new(&self.urls.identity_url, self.auth_manager.clone(), self.identity_http.clone())
    }

    pub fn queue_service_client(&self) -> QueueServiceClient {
        QueueServiceClient::new(&self.urls.qs_url, self.auth_manager.clone(), self.service_http.clone())
    }

    pub fn file_service_client(&self) -> FileServiceClient {
        FileServiceClient::new(&self.urls.fs_url, self.auth_manager.clone(), self.service_http.clone())
    }

    pub fn serverless_functions_client(&self) -> ServerlessFunctionsClient {
        ServerlessFunctionsClient::new(&self.urls.sf_url, self.auth_manager.clone(), self.service_http.clone())
    }

    pub fn state_machine_client(&self) -> StateMachineServiceClient {
        StateMachineServiceClient::new(&self.urls.sm_url, self.auth_manager.clone(), self.service_http.clone())
    }
}
