use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::settings::{LogFormat, LoggingConfig, SdkConfig};


#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "TRACE",
            LogLevel::DEBUG => "DEBUG",
            LogLevel::INFO => "INFO",
            LogLevel::WARN => "WARN",
            LogLevel::ERROR => "ERROR",
        }
    }
}

/// Logging settings: CLI level wins over the configured one, format comes from
/// the config or `LOG_FORMAT`.
pub fn resolve_logging(sdk_config: &SdkConfig, arg_log_level: Option<LogLevel>) -> LoggingConfig {
    let configured = sdk_config
        .logging
        .clone()
        .unwrap_or_else(|| LoggingConfig::new("info".to_owned(), LogFormat::from_env()));

    match arg_log_level {
        Some(level) => LoggingConfig::new(level.as_str().to_owned(), configured.format),
        None => configured,
    }
}

pub fn run(sdk_config: &SdkConfig, arg_log_level: Option<LogLevel>) {
    init_logging(&resolve_logging(sdk_config, arg_log_level));
}


/// Initialize tracing with the desired config.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    // Choose format layer
    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true)
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(true);

            let _ = registry.with(layer).try_init();
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_overrides_config() {
        let mut cfg = SdkConfig::default();
        cfg.logging = Some(LoggingConfig::new("warn".into(), LogFormat::Json));

        let resolved = resolve_logging(&cfg, Some(LogLevel::DEBUG));
        assert_eq!(resolved.level, "DEBUG");
        assert_eq!(resolved.format, LogFormat::Json);

        let resolved = resolve_logging(&cfg, None);
        assert_eq!(resolved.level, "warn");
    }
}
