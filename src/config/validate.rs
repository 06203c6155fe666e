//! Structural and semantic validation of a [`DialogConfig`].
//!
//! A document is applied atomically: any error rejects the whole `config`
//! command with zero state mutation. Warnings are surfaced in the log but
//! do not block application.

use crate::list_item::ListItemStatus;

use super::types::DialogConfig;

/// Outcome of validating one configuration document.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validate a configuration document.
pub fn validate(config: &DialogConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.title.as_deref().map(str::trim).unwrap_or("").is_empty() {
        report.errors.push("Title is required".to_string());
    }
    if config
        .message
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .is_empty()
    {
        report.errors.push("Message is required".to_string());
    }

    if config.buttons.is_empty() {
        report
            .warnings
            .push("No buttons defined - dialog may be uncloseable".to_string());
    }
    // At most one default and one cancel button; zero is legal for
    // unattended progress dialogs.
    if config.buttons.iter().filter(|b| b.is_default).count() > 1 {
        report
            .errors
            .push("Only one button can be marked as default".to_string());
    }
    if config.buttons.iter().filter(|b| b.is_cancel).count() > 1 {
        report
            .errors
            .push("Only one button can be marked as cancel".to_string());
    }

    if let Some(progress) = &config.progress {
        if progress.value < 0 || progress.value > progress.maximum {
            report.errors.push(format!(
                "Progress value ({}) must be between 0 and {}",
                progress.value, progress.maximum
            ));
        }
    }

    for item in &config.list_items {
        if item.title.trim().is_empty() {
            report
                .errors
                .push("List item title cannot be empty".to_string());
        }
        if !ListItemStatus::is_known(&item.status) {
            report.warnings.push(format!(
                "Unknown status '{}' for list item '{}'",
                item.status, item.title
            ));
        }
    }

    if let Some(styling) = &config.styling {
        if matches!(styling.width, Some(w) if w <= 0) {
            report.errors.push("Width must be positive".to_string());
        }
        if matches!(styling.height, Some(h) if h <= 0) {
            report.errors.push("Height must be positive".to_string());
        }
        if matches!(styling.opacity, Some(o) if !(0.0..=1.0).contains(&o)) {
            report
                .errors
                .push("Opacity must be between 0 and 1".to_string());
        }
    }

    report
}
