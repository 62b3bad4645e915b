//! Telemetry and structured logging setup.
//!
//! Provides consistent logging across all components with:
//! - Kind-tagged log lines for filtering
//! - Structured output for log aggregation
//! - Configurable verbosity via RUST_LOG

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format for log lines, selected via `QUAKEWATCH_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable compact lines (the default).
    Compact,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    /// Reads the format from the `QUAKEWATCH_LOG_FORMAT` environment
    /// variable.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("QUAKEWATCH_LOG_FORMAT").ok().as_deref())
    }

    /// Maps an optional variable value to a format. Anything other than
    /// "json" (case-insensitive) falls back to compact output.
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Initializes the telemetry/logging system.
///
/// Uses RUST_LOG environment variable for verbosity and
/// QUAKEWATCH_LOG_FORMAT for the output format.
/// Defaults to INFO level and compact output if not set.
///
/// Example RUST_LOG values:
/// - `info` - All info and above
/// - `quakewatch=debug` - Debug for our crate, default for others
/// - `quakewatch=trace,tokio=warn` - Trace for us, warn for tokio
pub fn init_telemetry() {
    match LogFormat::from_env() {
        LogFormat::Compact => init_telemetry_compact(),
        LogFormat::Json => init_telemetry_json(),
    }
}

fn init_telemetry_compact() {
    let subscriber = tracing_subscriber::registry().with(env_filter()).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    subscriber.init();
}

/// Initializes telemetry with JSON output (for production).
pub fn init_telemetry_json() {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE));

    subscriber.init();
}

/// Create env filter from RUST_LOG or use default:
/// INFO for everything, DEBUG for our crate.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,quakewatch=debug"))
}
