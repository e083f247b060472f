//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Primary environment variable for the log filter.
pub const LOG_ENV: &str = "SYMPTOM_ADVISOR_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Append events to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds the configuration from config-file settings and the environment.
    ///
    /// The filter comes from `SYMPTOM_ADVISOR_LOG`, then `RUST_LOG`, then the
    /// config file, then `warn` (`debug` when `verbose`).
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let env_directive = [LOG_ENV, "RUST_LOG"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());
        let configured = settings.and_then(|s| s.filter.clone());
        Self::resolve(settings, env_directive.or(configured), verbose)
    }

    fn resolve(settings: Option<&LoggingSettings>, directive: Option<String>, verbose: bool) -> Self {
        let fallback = if verbose { "debug" } else { "warn" };
        let filter = directive
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(fallback));

        let format = settings
            .and_then(|s| s.format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default();

        Self {
            format,
            filter,
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}
