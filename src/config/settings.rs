use serde::Deserialize;

/// ================================
/// SDK configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SdkConfig {
    /// Default credentials used by the auth manager.
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: String,
    /// Skip TLS certificate verification against the identity service.
    #[serde(default)]
    pub allow_self_sign_cert: bool,
    /// Serialize token acquisition through a single-permit gate.
    #[serde(default)]
    pub enable_auth_semaphore: bool,
    pub urls: ServiceUrls,
    pub logging: Option<LoggingConfig>,
}

/// Base urls of the deployment, passed unchanged to the clients.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceUrls {
    pub identity_url: String,
    #[serde(default)]
    pub qs_url: String,
    #[serde(default)]
    pub sm_url: String,
    #[serde(default)]
    pub fs_url: String,
    /// notification service, no client yet
    #[serde(default)]
    pub ns_url: String,
    #[serde(default)]
    pub sf_url: String,
}

impl ServiceUrls {
    fn trim(&mut self) {
        for url in [
            &mut self.identity_url,
            &mut self.qs_url,
            &mut self.sm_url,
            &mut self.fs_url,
            &mut self.ns_url,
            &mut self.sf_url,
        ] {
            let trimmed = url.trim().trim_end_matches('/').to_owned();
            *url = trimmed;
        }
    }
}

impl SdkConfig {
    pub fn new(
        account: impl Into<String>,
        user_id: impl Into<String>,
        password: impl Into<String>,
        urls: ServiceUrls,
    ) -> Self {
        Self {
            account: account.into(),
            user_id: user_id.into(),
            password: password.into(),
            urls,
            ..Default::default()
        }
    }

    pub fn allow_self_sign_cert(mut self, allow: bool) -> Self {
        self.allow_self_sign_cert = allow;
        self
    }

    pub fn enable_auth_semaphore(mut self, enable: bool) -> Self {
        self.enable_auth_semaphore = enable;
        self
    }

    /// Normalise urls and check the fields the auth manager cannot do without.
    pub fn normalize(mut self) -> Result<Self, String> {
        self.urls.trim();
        if self.urls.identity_url.is_empty() {
            return Err("urls.identity_url must not be empty".to_owned());
        }
        Ok(self)
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level: level, format: format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}
