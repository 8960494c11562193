//! Structured logging setup
//!
//! Diagnostics go through `tracing` and are written to stderr, leaving stdout
//! for the progress lines and the run summary. `RUST_LOG` takes precedence
//! over the configured level.
//!
//! ```no_run
//! use layerpack::util::logging;
//! use tracing::{info, warn};
//!
//! logging::init_from_env();
//!
//! info!(layer = "src/Domain.Core", "Bundle written");
//! warn!("Using default definition.");
//! ```

use std::env;
use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

pub const LOG_LEVEL_ENV: &str = "LAYERPACK_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "LAYERPACK_LOG_JSON";

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Emit one JSON object per event instead of human-readable lines
    pub use_json: bool,

    /// Include the module target (e.g., layerpack::analyzer) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    /// INFO level, plain text, targets on, locations off.
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `LAYERPACK_LOG_LEVEL` and `LAYERPACK_LOG_JSON`, falling back to defaults.
    pub fn from_env() -> Self {
        let level = env::var(LOG_LEVEL_ENV)
            .map(|s| parse_level(&s))
            .unwrap_or(Level::INFO);

        let use_json = env::var(LOG_JSON_ENV)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Case-insensitive; unknown values fall back to `Level::INFO` with a note on stderr.
///
/// ```
/// use layerpack::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter.add_directive(crate_directive(config.level));
        }

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

/// Initializes logging from `LAYERPACK_LOG_LEVEL` / `LAYERPACK_LOG_JSON`.
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}

fn crate_directive(level: Level) -> Directive {
    format!("layerpack={}", level)
        .parse()
        .unwrap_or_else(|_| LevelFilter::from_level(level).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(config.include_target);
        assert!(!config.include_location);
    }

    #[test]
    fn test_with_level() {
        let config = LoggingConfig::with_level(Level::DEBUG);
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.use_json);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(LOG_LEVEL_ENV, "warn");
        env::set_var(LOG_JSON_ENV, "true");

        let config = LoggingConfig::from_env();

        env::remove_var(LOG_LEVEL_ENV);
        env::remove_var(LOG_JSON_ENV);

        assert_eq!(config.level, Level::WARN);
        assert!(config.use_json);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var(LOG_LEVEL_ENV);
        env::remove_var(LOG_JSON_ENV);

        let config = LoggingConfig::from_env();

        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
    }

    #[test]
    fn test_crate_directive() {
        let directive = crate_directive(Level::DEBUG).to_string();
        assert!(directive.starts_with("layerpack"));
    }
}
