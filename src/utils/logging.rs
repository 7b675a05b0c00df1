use std::fmt;

use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

use crate::constants;

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text with timestamp, level, target and message
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Reads `VALIDATION_LOG_FORMAT`, falling back to [`LogFormat::Text`].
    pub fn from_env_or_default() -> Self {
        std::env::var(constants::ENV_LOG_FORMAT)
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Installs the global subscriber using the format from the environment.
///
/// Safe to call more than once: when a global subscriber is already set this
/// returns `Ok(())` and leaves it in place.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging_with(LogFormat::from_env_or_default())
}

/// Installs an `EnvFilter` (default `info`) and a text or JSON fmt layer, then
/// bridges `log` records into tracing.
pub fn init_logging_with(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(tracing_fmt::layer().with_target(true)),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(tracing_fmt::layer().json().with_target(true)),
        ),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already initialized");
        return Ok(());
    }

    LogTracer::init()?;
    tracing::debug!(%format, "logging initialized");
    Ok(())
}
