//! Structured JSONL logging plus human-readable stderr output.
//!
//! Dual-output logging:
//! - **JSONL to file** (~/.rdialog/logs/rdialog.jsonl) - structured, machine-parseable
//! - **Pretty to stderr** - compact, for whoever is watching the terminal
//!
//! # Usage
//!
//! ```rust,ignore
//! use rdialog::logging;
//!
//! // Keep the guard alive for the duration of the program.
//! let _guard = logging::init();
//!
//! tracing::info!(verb = "progress", value = 50, "Command dispatched");
//! ```
//!
//! Each JSONL line is a valid JSON object carrying timestamp, level,
//! target, message, and structured fields.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that must be kept alive for the duration of the
/// program; dropping it flushes remaining logs and closes the file.
pub fn init() -> LoggingGuard {
    let log_dir = log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join("rdialog.jsonl");

    // Open log file with append mode
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    // Non-blocking writer so slow disks never stall command dispatch.
    let (non_blocking_file, file_guard) = match file {
        Some(file) => tracing_appender::non_blocking(file),
        None => {
            eprintln!("[LOGGING] Failed to open {}, logging to stderr only", log_path.display());
            tracing_appender::non_blocking(std::io::sink())
        }
    };

    // Default to info, allow override via RUST_LOG
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,notify=warn"));

    // JSONL layer for file output
    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    // Pretty layer for stderr
    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// The log directory (~/.rdialog/logs/).
fn log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".rdialog").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("rdialog-logs"))
}

/// Path of the JSONL log file.
pub fn log_path() -> PathBuf {
    log_dir().join("rdialog.jsonl")
}
