//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with an explicit level and output format.
///
/// `RUST_LOG` still wins when set, so operators can override per-module
/// filters without touching the config file.
pub fn init_tracing_with(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
