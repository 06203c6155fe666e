//! List item model and the ordered arena tracking them.
//!
//! List items carry per-step deployment state (status, status text, icon,
//! numeric progress). The dispatcher resolves items by title first and by
//! positional index second, so the arena keeps both an ordered vector and
//! a title lookup side table.

use std::collections::HashMap;
use std::fmt;

/// Status of one list item, swiftDialog-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListItemStatus {
    /// Default state, no specific status.
    #[default]
    None,
    /// Waiting to be processed.
    Wait,
    /// Completed successfully.
    Success,
    /// Failed to complete.
    Fail,
    /// Encountered an error.
    Error,
    /// Queued for processing.
    Pending,
    /// Currently in progress.
    Progress,
}

impl ListItemStatus {
    /// Case-insensitive status lookup. Unknown tokens fall back to `None`,
    /// matching the permissive-ignore policy of the rest of the protocol.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "wait" => ListItemStatus::Wait,
            "success" => ListItemStatus::Success,
            "fail" => ListItemStatus::Fail,
            "error" => ListItemStatus::Error,
            "pending" => ListItemStatus::Pending,
            "progress" => ListItemStatus::Progress,
            _ => ListItemStatus::None,
        }
    }

    /// Whether a token names a known status.
    pub fn is_known(token: &str) -> bool {
        matches!(
            token.trim().to_ascii_lowercase().as_str(),
            "none" | "wait" | "success" | "fail" | "error" | "pending" | "progress"
        )
    }

    /// Unicode icon used when the item has no custom icon.
    pub fn icon(&self) -> &'static str {
        match self {
            ListItemStatus::None => "",
            ListItemStatus::Wait => "⏳",
            ListItemStatus::Success => "✅",
            ListItemStatus::Fail => "❌",
            ListItemStatus::Error => "⚠️",
            ListItemStatus::Pending => "🔵",
            ListItemStatus::Progress => "🔄",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListItemStatus::None => "none",
            ListItemStatus::Wait => "wait",
            ListItemStatus::Success => "success",
            ListItemStatus::Fail => "fail",
            ListItemStatus::Error => "error",
            ListItemStatus::Pending => "pending",
            ListItemStatus::Progress => "progress",
        }
    }
}

impl fmt::Display for ListItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked list item.
#[derive(Debug, Clone, Default)]
pub struct ListItemConfig {
    pub title: String,
    /// Custom icon: path, emoji, or icon name. Empty means use the status icon.
    pub icon: String,
    /// Remote icon URL; takes precedence over `icon` when set.
    pub icon_url: String,
    pub status: ListItemStatus,
    pub status_text: String,
    /// Per-item numeric progress, clamped to 0–100.
    pub progress: f64,
    pub visible: bool,
    /// Stable positional identity assigned at add time.
    pub index: usize,
}

impl ListItemConfig {
    pub fn new(title: impl Into<String>, index: usize) -> Self {
        Self {
            title: title.into(),
            visible: true,
            index,
            ..Default::default()
        }
    }

    /// The icon to display: custom URL, then custom icon, then status icon.
    pub fn display_icon(&self) -> &str {
        if !self.icon_url.is_empty() {
            &self.icon_url
        } else if !self.icon.is_empty() {
            &self.icon
        } else {
            self.status.icon()
        }
    }

    pub fn set_progress(&mut self, value: f64) {
        self.progress = value.clamp(0.0, 100.0);
    }
}

/// Ordered arena of list items with title-first resolution.
///
/// Indices handed out by `add` keep increasing until `clear`, mirroring the
/// original dialog's behavior of never reusing a removed item's index.
#[derive(Debug, Default)]
pub struct ListItems {
    items: Vec<ListItemConfig>,
    by_title: HashMap<String, usize>,
    next_index: usize,
}

impl ListItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListItemConfig> {
        self.items.iter()
    }

    /// Append a new item, assigning it the next stable index. An item with a
    /// duplicate title shadows the older one in title lookups. Returns the
    /// assigned stable index.
    pub fn add(&mut self, mut item: ListItemConfig) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        item.index = index;
        self.by_title.insert(item.title.clone(), index);
        self.items.push(item);
        index
    }

    /// Resolve by title first, falling back to stable index.
    pub fn resolve(&self, title: Option<&str>, index: Option<usize>) -> Option<usize> {
        if let Some(title) = title {
            if let Some(&stable) = self.by_title.get(title) {
                return self.items.iter().position(|item| item.index == stable);
            }
        }
        if let Some(index) = index {
            return self.items.iter().position(|item| item.index == index);
        }
        None
    }

    pub fn get(&self, position: usize) -> Option<&ListItemConfig> {
        self.items.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut ListItemConfig> {
        self.items.get_mut(position)
    }

    /// Remove the item at `position`, keeping remaining stable indices intact.
    pub fn remove(&mut self, position: usize) -> Option<ListItemConfig> {
        if position >= self.items.len() {
            return None;
        }
        let item = self.items.remove(position);
        if self.by_title.get(&item.title) == Some(&item.index) {
            self.by_title.remove(&item.title);
        }
        Some(item)
    }

    /// Remove everything and reset the index counter to 0.
    pub fn clear(&mut self) {
        self.items.clear();
        self.by_title.clear();
        self.next_index = 0;
    }

    /// Replace the whole arena, used when a bulk configuration is applied.
    pub fn replace_with(&mut self, items: Vec<ListItemConfig>) {
        self.clear();
        for item in items {
            self.add(item);
        }
    }
}
