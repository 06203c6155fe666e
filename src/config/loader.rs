//! Parsing configuration documents from strings and files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{DialogError, Result};

use super::types::DialogConfig;

/// Parse a configuration document from a JSON string.
pub fn from_str(json: &str) -> Result<DialogConfig> {
    if json.trim().is_empty() {
        return Err(DialogError::ConfigInvalid {
            errors: vec!["empty configuration document".to_string()],
        });
    }
    Ok(serde_json::from_str(json)?)
}

/// Parse a configuration document from a JSON file.
pub fn from_file(path: impl AsRef<Path>) -> Result<DialogConfig> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let config = from_str(&json)?;
    info!(path = %path.display(), "Loaded JSON dialog configuration");
    Ok(config)
}
