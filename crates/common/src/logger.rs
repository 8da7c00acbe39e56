use crate::config::AppConfig;
use crate::error::CaseBriefError;
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file written under `AppConfig::log_dir`
const LOG_FILE_NAME: &str = "casebrief.log";

/// Initialize logging system
///
/// Console output goes to stderr so stdout only carries the summary; the
/// file layer appends to `casebrief.log` in the configured log directory.
/// `RUST_LOG` takes precedence over `log_level`.
pub fn setup_logging(config: &AppConfig) -> Result<(), CaseBriefError> {
    let level = parse_log_level(&config.log_level)?;
    config.ensure_directories()?;

    let log_file_path = config.get_log_path(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| {
            CaseBriefError::config(format!(
                "Failed to open log file {}: {}",
                log_file_path.display(),
                e
            ))
        })?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter(level));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter(level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CaseBriefError::config(format!("Failed to install logger: {}", e)))?;

    tracing::debug!(level = %level, log_file = %log_file_path.display(), "logging initialized");

    Ok(())
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Parse a configured log level name (case-insensitive, `warning` accepted)
pub fn parse_log_level(level: &str) -> Result<Level, CaseBriefError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(CaseBriefError::config(format!(
            "log_level must be one of trace, debug, info, warn, error (got '{}')",
            level
        ))),
    }
}
