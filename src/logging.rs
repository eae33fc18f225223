//! Diagnostic logging to stderr; stdout carries only the export report.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "DBX_SQL_CLI_LOG";

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(custom_filter: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(custom_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .try_init();
}

/// Priority: custom filter > DBX_SQL_CLI_LOG > RUST_LOG > default
fn build_env_filter(custom_filter: Option<&str>) -> EnvFilter {
    if let Some(filter) = custom_filter {
        return EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(default_log_filter()));
    }

    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
}

pub fn default_log_filter() -> &'static str {
    "warn"
}
