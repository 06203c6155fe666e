//! Configuration struct definitions.
//!
//! Field names follow the original JSON document format (camelCase);
//! everything is optional or defaulted so partial documents deserialize,
//! and unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Top-level bulk dialog configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogConfig {
    pub title: Option<String>,
    pub message: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub buttons: Vec<ButtonConfig>,
    pub progress: Option<ProgressConfig>,
    pub list_items: Vec<ListItemEntry>,
    pub styling: Option<StylingConfig>,
    pub behavior: Option<BehaviorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonConfig {
    pub text: String,
    pub action: String,
    pub icon: Option<String>,
    pub style: Option<String>,
    pub is_default: bool,
    pub is_cancel: bool,
    pub is_enabled: bool,
    pub tooltip: Option<String>,
    pub shortcut: Option<String>,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            action: String::new(),
            icon: None,
            style: None,
            is_default: false,
            is_cancel: false,
            is_enabled: true,
            tooltip: None,
            shortcut: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressConfig {
    pub value: i32,
    pub maximum: i32,
    pub text: Option<String>,
    pub show_percentage: bool,
    pub indeterminate: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            value: 0,
            maximum: 100,
            text: None,
            show_percentage: true,
            indeterminate: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListItemEntry {
    pub title: String,
    pub status: String,
    pub status_text: Option<String>,
    pub icon: Option<String>,
    pub is_enabled: bool,
}

impl Default for ListItemEntry {
    fn default() -> Self {
        Self {
            title: String::new(),
            status: "none".to_string(),
            status_text: None,
            icon: None,
            is_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylingConfig {
    pub theme: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub position: Option<String>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<i32>,
    pub opacity: Option<f64>,
    pub animations: Option<AnimationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationConfig {
    pub fade_in: bool,
    pub slide_in: Option<String>,
    pub duration: i32,
    pub easing: Option<String>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fade_in: false,
            slide_in: None,
            duration: 300,
            easing: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorConfig {
    /// Seconds before the dialog auto-dismisses; None disables.
    pub timeout: Option<i32>,
    pub auto_close: bool,
    pub moveable: bool,
    pub resizable: bool,
    pub top_most: bool,
    pub center_on_screen: bool,
    pub show_in_taskbar: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            auto_close: false,
            moveable: true,
            resizable: false,
            top_most: false,
            center_on_screen: true,
            show_in_taskbar: true,
        }
    }
}
