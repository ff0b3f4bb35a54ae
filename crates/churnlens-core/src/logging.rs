//! Tracing bootstrap for embedders.

use tracing_subscriber::EnvFilter;

/// Environment variable whose directives override the configured filter.
pub const LOG_ENV: &str = "CHURNLENS_LOG";

pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: `CHURNLENS_LOG` first, then `configured`, then
/// [`DEFAULT_FILTER`]. Unparseable directives fall through to the next source.
#[must_use]
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a stderr fmt subscriber. Returns `false` when a global
/// subscriber was already installed.
pub fn init_tracing(configured: Option<&str>) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(configured))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
