use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::SdkConfig;

/// Load SDK config from a YAML file, expanding `${VAR}` / `${VAR:default}`
/// from the environment first.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<SdkConfig> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config '{}'", path.display()))?;

    parse_config(&expand_env_vars(&content))
}

pub fn parse_config(content: &str) -> Result<SdkConfig> {
    let config: SdkConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))
        .map_err(|e| anyhow!("Invalid config format: {}", e))?;

    debug!("validating config ...");
    config.normalize().map_err(|e| anyhow!("Invalid config: {}", e))
}

fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
