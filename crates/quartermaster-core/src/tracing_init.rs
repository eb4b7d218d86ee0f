//! Log subscriber setup for the ledger server.
//!
//! The configured level applies to the service's own crates and the HTTP
//! trace layer. `RUST_LOG`, when set, replaces those directives entirely.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

/// Targets the configured level applies to.
const LOG_TARGETS: [&str; 3] = ["quartermaster_server", "quartermaster_core", "tower_http"];

/// Filter directives enabling `level` for every target in [`LOG_TARGETS`].
pub fn default_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the event filter. An unparseable level or `RUST_LOG` value is a
/// configuration error.
pub fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = rust_log
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| default_directives(level.trim()), str::to_string);
    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter {directives:?}: {e}")))
}

/// Install the global subscriber.
///
/// * `level` -- `server.log_level` from the resolved config.
/// * `log_json` -- emit one JSON object per event instead of text lines.
pub fn init_tracing(level: &str, log_json: bool) -> Result<()> {
    let filter = build_filter(level, std::env::var("RUST_LOG").ok().as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|e| Error::Config(format!("Tracing already initialised: {e}")))
}
