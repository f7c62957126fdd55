//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
///
/// Returns `false` if a logger was already installed.
pub fn init() -> bool {
    env_logger::try_init().is_ok()
}

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still wins when it is set. Returns `false` if a logger was
/// already installed.
pub fn init_with_filter(default_filter: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
