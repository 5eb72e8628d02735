//! Tracing/logging initialization.
//!
//! JSON lines on stdout, filtered by `RUST_LOG` when set.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `default_filter` applies when `RUST_LOG`
/// is unset or unparsable.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}
