//! Structured logging.

use crate::config::LoggingSettings;

/// Default filter when neither `RUST_LOG` nor config sets one.
const DEFAULT_FILTER: &str = "info,tower_http=info,aws_config=warn,aws_smithy_runtime=warn";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "debug,hyper=info,aws_smithy_runtime=info";

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
    /// Parses a format name, falling back to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings.
    ///
    /// `RUST_LOG` takes precedence over the configured level; `verbose`
    /// takes precedence over both.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let format = settings
            .format
            .as_deref()
            .map(LogFormat::parse)
            .unwrap_or_default();

        let filter = if verbose {
            VERBOSE_FILTER.to_string()
        } else {
            std::env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| settings.level.clone())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string())
        };

        Self { format, filter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("other"), LogFormat::Pretty);
    }

    #[test]
    fn test_verbose_wins() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            level: Some("warn".to_string()),
        };
        let config = LoggingConfig::from_settings(&settings, true);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, VERBOSE_FILTER);
    }
}
