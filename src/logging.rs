//! Structured diagnostics via `tracing`.
//!
//! Logs go to stderr so they never mix with scripts printed on stdout.
//! Filter precedence: `DESKSCRIPT_LOG` env var, then `--log-level`, then
//! `--verbose` (debug), then `warn`.

use crate::error::{DeskError, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV_VAR: &str = "DESKSCRIPT_LOG";

/// Logging settings collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    pub level: Option<String>,
    pub verbose: bool,
    pub color: bool,
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init_logging(options: &LoggingOptions) -> Result<()> {
    let filter = build_env_filter(options)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(options.color)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| DeskError::ConfigError(format!("failed to initialize logging: {}", e)))
}

fn build_env_filter(options: &LoggingOptions) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }

    let level = default_level(options);
    EnvFilter::try_new(level)
        .map_err(|e| DeskError::ConfigError(format!("invalid log level '{}': {}", level, e)))
}

fn default_level(options: &LoggingOptions) -> &str {
    match (&options.level, options.verbose) {
        (Some(level), _) => level.as_str(),
        (None, true) => "debug",
        (None, false) => "warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_warn() {
        assert_eq!(default_level(&LoggingOptions::default()), "warn");
    }

    #[test]
    fn verbose_selects_debug() {
        let options = LoggingOptions {
            verbose: true,
            ..LoggingOptions::default()
        };
        assert_eq!(default_level(&options), "debug");
    }

    #[test]
    fn explicit_level_wins_over_verbose() {
        let options = LoggingOptions {
            level: Some("trace".to_string()),
            verbose: true,
            color: false,
        };
        assert_eq!(default_level(&options), "trace");
    }
}
