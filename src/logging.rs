//! tracing subscriber setup for binaries and examples embedding the SDK.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "admin_console_sdk=info";

/// Install a fmt subscriber. `RUST_LOG` wins over `default_filter`. Safe to call twice.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
