//! Logging setup for netsync applications
//!
//! The library only emits `tracing` events. Binaries pick an output once at
//! startup; the default filters scope output to the netsync crates so a
//! host application's own dependencies stay quiet.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter used by `Development` and `Json` when no env override is set
pub const DEFAULT_FILTER: &str = "warn,netsync_state=info,entity_table=info";

/// Filter used by `Debug` when no env override is set
pub const DEBUG_FILTER: &str = "warn,netsync_state=trace,entity_table=debug";

/// Where and how update cycles are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact human-readable lines on stderr
    Development,
    /// One JSON object per event, for log collectors
    Json,
    /// Full cycle tracing with thread names and source locations
    Debug,
}

impl LoggingMode {
    /// Parse a `NETSYNC_LOG_MODE` value; unknown values are `Silent`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => LoggingMode::Development,
            "json" => LoggingMode::Json,
            "debug" => LoggingMode::Debug,
            _ => LoggingMode::Silent,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install the global subscriber for `mode`
///
/// # Environment Variables
///
/// - `NETSYNC_LOG_LEVEL`: filter directives, e.g. "netsync_state=debug"
/// - `RUST_LOG`: used when `NETSYNC_LOG_LEVEL` is unset
///
/// ```rust,ignore
/// netsync_state::init_logging(LoggingMode::Development)?;
/// ```
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let result = match mode {
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => Registry::default()
            .with(fmt::layer().with_target(false).compact())
            .with(env_filter(DEFAULT_FILTER))
            .try_init(),
        LoggingMode::Json => Registry::default()
            .with(fmt::layer().json().with_current_span(false))
            .with(env_filter(DEFAULT_FILTER))
            .try_init(),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .pretty()
                    .with_thread_names(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(env_filter(DEBUG_FILTER))
            .try_init(),
    };

    result.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Install the subscriber named by `NETSYNC_LOG_MODE`
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var("NETSYNC_LOG_MODE")
        .map(|name| LoggingMode::from_name(&name))
        .unwrap_or(LoggingMode::Silent);
    init_logging(mode)
}

fn env_filter(default_directives: &str) -> EnvFilter {
    let directives = std::env::var("NETSYNC_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_directives.to_string());
    EnvFilter::new(directives)
}
