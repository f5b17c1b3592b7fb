//! Message helpers shared by the library and the CLI.
//!
//! Log output goes to stderr through `tracing`, so stdout only ever carries
//! rendered JSON.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`warn` when unset).
pub const LOG_ENV: &str = "SPEC_APPLY_LOG";

/// Build a user-facing error message and record it at debug level.
pub fn error_message(msg: impl Into<String>) -> String {
    let msg = msg.into();
    tracing::debug!(error = %msg, "reporting error");
    msg
}

pub fn warn(msg: impl Into<String>) {
    let msg = msg.into();
    tracing::warn!("{}", msg);
}

/// Filter for the given verbosity: 0 uses `SPEC_APPLY_LOG` (or `warn`),
/// 1 forces `info`, 2 or more forces `debug`.
pub fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    }
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_logging(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
