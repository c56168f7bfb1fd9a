//! Diagnostic tracing for the engine
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the binary. Verdicts printed by the CLI are product output and never go
//! through here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::io::configuration::DEFAULT_LOG_FILTER;

/// Install a compact stderr subscriber filtered by `RUST_LOG`
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when the variable is unset or invalid.
/// Returns `false` if a global subscriber was already installed.
///
/// ```bash
/// RUST_LOG=arrowpath=debug arrowpath --level open
/// ```
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .is_ok()
}
