use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directives when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,sea_orm=warn,sqlx=warn";

/// Output shape for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Parse a config value; anything other than `json` falls back to compact.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact }
    }
}

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Initialize the global subscriber. Repeated calls are ignored so tests and
/// the binary can both call it.
pub fn init_logging(format: LogFormat, default_directives: &str) {
    let builder = fmt()
        .with_env_filter(env_filter(default_directives))
        .with_target(false)
        .with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Compact human-readable logs on stdout, honoring `RUST_LOG`.
pub fn init_logging_default() {
    init_logging(LogFormat::Compact, DEFAULT_FILTER);
}

/// Structured JSON logs on stdout for container deployments.
pub fn init_logging_json() {
    init_logging(LogFormat::Json, DEFAULT_FILTER);
}
