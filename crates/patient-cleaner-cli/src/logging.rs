//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so they never mix with command output.
//!
//! - no `-v`: warnings only (values kept under `--keep-going`)
//! - `-v`: stage summaries
//! - `-vv`: header renames and parser details
//! - `-vvv`: everything
//!
//! Row values stay redacted unless `--log-data` is given.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter.
    pub level: Level,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
    /// Whether row-level (PHI) values may be logged.
    pub log_data: bool,
}

impl LogConfig {
    /// Create a `LogConfig` from the CLI verbosity count.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_ansi: true,
            log_data: false,
        }
    }

    /// Enable or disable row-level logging of patient values.
    pub fn with_log_data(mut self, enable: bool) -> Self {
        self.log_data = enable;
        self
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    patient_cleaner::logging::set_log_data(config.log_data);

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    // RUST_LOG overrides the verbosity flags.
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!(
            "warn,patient_cleaner={level},patient_cleaner_cli={level}",
            level = level
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9).level, Level::TRACE);
    }

    #[test]
    fn test_log_data_off_by_default() {
        assert!(!LogConfig::from_verbosity(3).log_data);
        assert!(LogConfig::from_verbosity(0).with_log_data(true).log_data);
    }
}
