//! Logging setup for the Bookify services.
//!
//! All crates log through `tracing`; this module installs the subscriber once
//! at startup.

use bookify_config::LoggingConfig;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets that receive the configured level when `RUST_LOG` is not set.
const LOG_TARGETS: &[&str] = &[
    "bookify_backend",
    "bookify_bookings",
    "bookify_common",
    "bookify_config",
    "bookify_db",
    "tower_http",
];

/// Initialize the tracing subscriber from the optional `[logging]` section.
pub fn init_from_config(config: Option<&LoggingConfig>) {
    let level = config
        .map(|logging| parse_level(&logging.level))
        .unwrap_or(Level::INFO);
    init_with_level(level);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` takes precedence over `level` when it is set. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Parses a level name, falling back to INFO for anything unknown.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

fn default_filter(level: Level) -> EnvFilter {
    LOG_TARGETS
        .iter()
        .fold(EnvFilter::new("warn"), |filter, target| {
            match format!("{}={}", target, level).parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => filter,
            }
        })
}
