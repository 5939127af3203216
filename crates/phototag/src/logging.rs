//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Everything goes to stderr.

use phototag_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global subscriber.
///
/// `level` is used unless RUST_LOG is set, in which case RUST_LOG wins.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
pub fn init_from_config(config: &LoggingConfig, verbose: bool, json_logs: bool) {
    init(
        effective_level(config, verbose),
        json_logs || config.format == "json",
    );
}

/// `--verbose` raises the configured level to at least debug.
fn effective_level(config: &LoggingConfig, verbose: bool) -> &str {
    match config.level.as_str() {
        "trace" => "trace",
        _ if verbose => "debug",
        level => level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_verbose_raises_to_debug() {
        assert_eq!(effective_level(&logging("info"), true), "debug");
        assert_eq!(effective_level(&logging("warn"), true), "debug");
    }

    #[test]
    fn test_trace_is_kept() {
        assert_eq!(effective_level(&logging("trace"), true), "trace");
        assert_eq!(effective_level(&logging("trace"), false), "trace");
    }

    #[test]
    fn test_configured_level_without_verbose() {
        assert_eq!(effective_level(&logging("warn"), false), "warn");
    }
}
