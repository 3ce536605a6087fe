//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level priority:
//! 1. `--log-level` flag
//! 2. `PLANREPORT_LOG` environment variable (any `EnvFilter` directive)
//! 3. `info`
//!
//! Logs go to stderr so stdout stays usable for summaries.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

pub const LOG_ENV: &str = "PLANREPORT_LOG";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<tracing::Level>) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.as_str().to_lowercase()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
