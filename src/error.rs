use thiserror::Error;
use tracing::{error, warn};

/// Domain errors for the dialog command engine.
///
/// Only monitor startup surfaces a hard error to the caller; everything
/// else in the protocol path is reported through events or boolean
/// outcomes so a misbehaving script can never crash the dialog process.
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("invalid command file path: {path}")]
    InvalidPath { path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("invalid JSON configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("configuration rejected: {}", errors.join("; "))]
    ConfigInvalid { errors: Vec<String> },
}

pub type Result<T> = std::result::Result<T, DialogError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the script driving the dialog
/// doesn't need to know.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
