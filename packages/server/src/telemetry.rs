//! Tracing subscriber setup.
//!
//! `RUST_LOG` controls the filter. `log.format = "json"` in the config
//! switches to structured output; anything else prints human-readable lines.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "info,uzcode_server=debug,tower_http=info";

pub fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match log.format.as_deref() {
        Some("json") => builder.json().init(),
        _ => builder.init(),
    }
}
