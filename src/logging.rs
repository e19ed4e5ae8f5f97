//! Logging initialization built on `tracing`.
//!
//! Verbosity maps to levels: default warn, `-v` info, `-vv` debug. `-q`
//! silences everything except errors. `RUST_LOG` wins over the flags when
//! set, so targeted debugging filters keep working.

use crate::error::Result;
use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber, writing to stderr so stdout
/// stays clean for command output.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sprintdeck={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}

/// Test helper: install a quiet subscriber, ignoring double-init.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("sprintdeck=error"))
        .with_writer(std::io::stderr)
        .with_test_writer()
        .try_init();
}
