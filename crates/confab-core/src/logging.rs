//! Logging bootstrap.
//!
//! Installs the global fmt subscriber once. The `RUST_LOG` environment
//! variable wins over the configured default level.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("info");
        init("debug");
        tracing::info!("logging initialized twice without panic");
    }
}
