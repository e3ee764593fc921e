//! Logging configuration and initialization for the CLI.

use std::env;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `EnvFilter` directive.
pub(crate) const LEVEL_ENV: &str = "INQUIRY_LOG_LEVEL";

/// Environment variable selecting `pretty` or `json` output.
pub(crate) const FORMAT_ENV: &str = "INQUIRY_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoggingConfig {
    pub(crate) level: String,
    pub(crate) format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum LoggingInitError {
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Logging settings from the environment, with `format` taking precedence
/// over [`FORMAT_ENV`] when given.
pub(crate) fn logging_config_from_env(format: Option<LogFormat>) -> LoggingConfig {
    let mut config = LoggingConfig::default();

    if let Ok(level) = env::var(LEVEL_ENV) {
        let trimmed = level.trim();
        if !trimmed.is_empty() {
            config.level = trimmed.to_string();
        }
    }

    if let Some(parsed) = env::var(FORMAT_ENV).ok().as_deref().and_then(parse_log_format) {
        config.format = parsed;
    }
    if let Some(format) = format {
        config.format = format;
    }

    config
}

/// Install the global subscriber. Logs go to stderr so tables printed to
/// stdout stay clean.
pub(crate) fn init_logging(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let env_filter =
        EnvFilter::try_new(config.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(matches!(config.format, LogFormat::Pretty));

    match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }

    info!(
        event = "app.start",
        log_level = %config.level,
        log_format = ?config.format,
        version = inquiry::VERSION
    );
    Ok(())
}

fn parse_log_format(raw: &str) -> Option<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" => Some(LogFormat::Pretty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format(" JSON "), Some(LogFormat::Json));
        assert_eq!(parse_log_format("pretty"), Some(LogFormat::Pretty));
        assert_eq!(parse_log_format("xml"), None);
    }

    #[test]
    fn test_explicit_format_wins() {
        let config = logging_config_from_env(Some(LogFormat::Json));
        assert_eq!(config.format, LogFormat::Json);
    }
}
