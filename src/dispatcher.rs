//! Command dispatcher: maps each parsed command to an effect.
//!
//! The dispatcher owns the list item arena and the numeric progress value,
//! and pushes every other effect through the [`DialogSurface`] collaborator
//! (the out-of-scope rendering layer). Commands are processed strictly one
//! at a time in arrival order; the surface implementation is responsible
//! for marshalling onto its own UI thread and returning only when the
//! effect has landed, so `listitem` operations can never interleave.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::command::{Command, Verb};
use crate::config::{self, DialogConfig};
use crate::error::ResultExt;
use crate::executor::{ShellExecutor, DEFAULT_TIMEOUT};
use crate::list_item::{ListItemConfig, ListItemStatus, ListItems};

/// Scalar dialog properties settable through single-value verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogProperty {
    Width,
    Height,
    Position,
    Icon,
    Image,
    Button1Text,
    Button2Text,
}

/// The dialog-state collaborator consumed by the dispatcher.
///
/// Implementations own the actual window. Every method must complete the
/// effect before returning (marshalling to a UI thread and waiting, if
/// there is one); the dispatcher will not hand over the next command until
/// the current one has landed.
pub trait DialogSurface {
    fn set_title(&mut self, title: &str);
    fn set_message(&mut self, message: &str);
    fn set_progress(&mut self, value: u32);
    fn set_progress_text(&mut self, text: &str);
    fn item_added(&mut self, item: &ListItemConfig);
    fn item_updated(&mut self, position: usize, item: &ListItemConfig);
    fn item_removed(&mut self, position: usize);
    fn items_cleared(&mut self);
    fn apply_style(&mut self, style: &str);
    fn apply_theme(&mut self, theme: &str);
    fn set_property(&mut self, property: DialogProperty, value: &str);
    fn apply_config(&mut self, config: &DialogConfig);
    fn close(&mut self);
}

/// Maps commands to effects against a [`DialogSurface`].
pub struct CommandDispatcher<S: DialogSurface> {
    surface: S,
    executor: ShellExecutor,
    items: ListItems,
    progress: i32,
    exec_timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl<S: DialogSurface> CommandDispatcher<S> {
    pub fn new(surface: S, executor: ShellExecutor) -> Self {
        Self {
            surface,
            executor,
            items: ListItems::new(),
            progress: 0,
            exec_timeout: DEFAULT_TIMEOUT,
            working_dir: None,
        }
    }

    /// Override the subprocess timeout applied to `execute*` verbs.
    pub fn with_exec_timeout(mut self, timeout: Duration) -> Self {
        self.exec_timeout = timeout;
        self
    }

    /// Working directory handed to spawned subprocesses.
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn items(&self) -> &ListItems {
        &self.items
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    /// Execute one command. Returns the command's success flag; failures
    /// are logged and never interrupt processing of subsequent commands.
    pub fn dispatch(&mut self, command: &Command) -> bool {
        let ok = match command.verb {
            Verb::Title => {
                self.surface.set_title(&command.value);
                true
            }
            Verb::Message => {
                self.surface.set_message(&command.value);
                true
            }
            Verb::Progress => match command.value.trim().parse::<i32>() {
                Ok(value) => {
                    self.set_progress(value);
                    true
                }
                Err(_) => false,
            },
            Verb::ProgressText => {
                self.surface.set_progress_text(&command.value);
                true
            }
            Verb::ProgressIncrement => match command.value.trim().parse::<i32>() {
                Ok(delta) => {
                    self.set_progress(self.progress + delta);
                    true
                }
                Err(_) => false,
            },
            Verb::ProgressReset => {
                self.set_progress(0);
                let text = if command.value.is_empty() {
                    "Waiting..."
                } else {
                    command.value.as_str()
                };
                self.surface.set_progress_text(text);
                true
            }
            Verb::Quit => {
                info!("Quit requested via command file");
                self.surface.close();
                true
            }
            Verb::ListItem => self.dispatch_list_item(command),
            Verb::List => self.dispatch_list(command),
            Verb::Config => self.dispatch_config(command),
            Verb::Style => {
                self.surface.apply_style(&command.value);
                true
            }
            Verb::Theme => {
                self.surface.apply_theme(&command.value);
                true
            }
            Verb::Execute => {
                self.executor
                    .execute(&command.value, self.working_dir.as_ref(), self.exec_timeout)
                    .success
            }
            Verb::ExecutePowerShell => {
                self.executor
                    .execute_powershell(&command.value, self.working_dir.as_ref(), self.exec_timeout)
                    .success
            }
            Verb::ExecuteOutput => {
                self.executor
                    .execute_and_capture(&command.value, self.working_dir.as_ref(), self.exec_timeout)
                    .success
            }
            Verb::Width => self.set_property(DialogProperty::Width, command),
            Verb::Height => self.set_property(DialogProperty::Height, command),
            Verb::Position => self.set_property(DialogProperty::Position, command),
            Verb::Icon => self.set_property(DialogProperty::Icon, command),
            Verb::Image => self.set_property(DialogProperty::Image, command),
            Verb::Button1Text => self.set_property(DialogProperty::Button1Text, command),
            Verb::Button2Text => self.set_property(DialogProperty::Button2Text, command),
        };

        if !ok {
            warn!(verb = %command.verb, raw = %command.raw, "Command failed");
        }
        ok
    }

    /// Apply a validated configuration document wholesale: dialog state,
    /// progress, and the list item arena are all replaced.
    pub fn apply_config(&mut self, config: &DialogConfig) -> bool {
        let report = config::validate(config);
        for warning in &report.warnings {
            warn!(warning = %warning, "Configuration warning");
        }
        if !report.is_valid() {
            for error in &report.errors {
                warn!(error = %error, "Configuration rejected");
            }
            return false;
        }

        self.surface.apply_config(config);

        if let Some(progress) = &config.progress {
            // Documents may carry a custom maximum; the dialog tracks 0-100.
            // The intermediate is widened so large value/maximum pairs that
            // pass validation cannot overflow i32.
            self.progress = if progress.maximum > 0 && progress.maximum != 100 {
                ((progress.value as i64 * 100) / progress.maximum as i64).clamp(0, 100) as i32
            } else {
                progress.value.clamp(0, 100)
            };
        }

        let items = config
            .list_items
            .iter()
            .map(|entry| {
                let mut item = ListItemConfig::new(entry.title.clone(), 0);
                item.status = ListItemStatus::parse(&entry.status);
                item.status_text = entry.status_text.clone().unwrap_or_default();
                item.icon = entry.icon.clone().unwrap_or_default();
                item.visible = entry.is_enabled;
                item
            })
            .collect();
        self.items.replace_with(items);

        info!(
            buttons = config.buttons.len(),
            list_items = config.list_items.len(),
            "Configuration applied"
        );
        true
    }

    fn set_progress(&mut self, value: i32) {
        self.progress = value.clamp(0, 100);
        self.surface.set_progress(self.progress as u32);
    }

    fn set_property(&mut self, property: DialogProperty, command: &Command) -> bool {
        self.surface.set_property(property, &command.value);
        true
    }

    fn dispatch_list_item(&mut self, command: &Command) -> bool {
        let action = resolve_list_item_action(command);
        let title = command.param("title");
        let index = command
            .param("index")
            .and_then(|raw| raw.trim().parse::<usize>().ok());

        match action {
            ListItemAction::Add => {
                let Some(title) = title.filter(|t| !t.is_empty()) else {
                    warn!(raw = %command.raw, "listitem add requires a title");
                    return false;
                };
                let mut item = ListItemConfig::new(title, 0);
                if let Some(status) = command.param("status") {
                    item.status = ListItemStatus::parse(status);
                }
                if let Some(text) = command.param("statustext") {
                    item.status_text = text.to_string();
                }
                if let Some(icon) = command.param("icon") {
                    item.icon = icon.to_string();
                }
                if let Some(url) = command.param("iconurl") {
                    item.icon_url = url.to_string();
                }
                let index = self.items.add(item);
                if let Some(position) = self.items.resolve(None, Some(index)) {
                    if let Some(item) = self.items.get(position) {
                        self.surface.item_added(item);
                    }
                }
                true
            }
            ListItemAction::Update => {
                let Some(position) = self.items.resolve(title, index) else {
                    warn!(
                        title = title.unwrap_or(""),
                        index = ?index,
                        "List item not found for update"
                    );
                    return false;
                };
                if let Some(item) = self.items.get_mut(position) {
                    if let Some(status) = command.param("status") {
                        item.status = ListItemStatus::parse(status);
                    }
                    if let Some(text) = command.param("statustext") {
                        item.status_text = text.to_string();
                    }
                    if let Some(icon) = command.param("icon") {
                        item.icon = icon.to_string();
                    }
                }
                if let Some(item) = self.items.get(position) {
                    self.surface.item_updated(position, item);
                }
                true
            }
            ListItemAction::Delete => {
                let Some(position) = self.items.resolve(title, index) else {
                    warn!(
                        title = title.unwrap_or(""),
                        index = ?index,
                        "List item not found for delete"
                    );
                    return false;
                };
                self.items.remove(position);
                self.surface.item_removed(position);
                true
            }
        }
    }

    fn dispatch_list(&mut self, command: &Command) -> bool {
        match command.param("action") {
            Some(action) if action.eq_ignore_ascii_case("clear") => {
                self.items.clear();
                self.surface.items_cleared();
                true
            }
            other => {
                warn!(action = ?other, "Unsupported list action");
                false
            }
        }
    }

    fn dispatch_config(&mut self, command: &Command) -> bool {
        let value = command.value.trim();
        // Inline JSON on the command line, or a path to a JSON file.
        let loaded = if value.starts_with('{') {
            config::from_str(value)
        } else {
            config::from_file(value)
        };
        match loaded.warn_on_err() {
            Some(config) => self.apply_config(&config),
            None => false,
        }
    }
}

/// Headless surface that logs every effect. Used by the binary until a
/// real window backend is wired in, and handy in scripts that only want
/// the protocol side effects (subprocesses, logs).
#[derive(Debug, Default)]
pub struct TracingSurface {
    closed: bool,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DialogSurface for TracingSurface {
    fn set_title(&mut self, title: &str) {
        info!(title = title, "Dialog title");
    }

    fn set_message(&mut self, message: &str) {
        info!(message = message, "Dialog message");
    }

    fn set_progress(&mut self, value: u32) {
        info!(value, "Dialog progress");
    }

    fn set_progress_text(&mut self, text: &str) {
        info!(text = text, "Dialog progress text");
    }

    fn item_added(&mut self, item: &ListItemConfig) {
        info!(title = %item.title, status = %item.status, "List item added");
    }

    fn item_updated(&mut self, position: usize, item: &ListItemConfig) {
        info!(
            position,
            title = %item.title,
            status = %item.status,
            status_text = %item.status_text,
            "List item updated"
        );
    }

    fn item_removed(&mut self, position: usize) {
        info!(position, "List item removed");
    }

    fn items_cleared(&mut self) {
        info!("List items cleared");
    }

    fn apply_style(&mut self, style: &str) {
        info!(style = style, "Dialog style");
    }

    fn apply_theme(&mut self, theme: &str) {
        info!(theme = theme, "Dialog theme");
    }

    fn set_property(&mut self, property: DialogProperty, value: &str) {
        info!(property = ?property, value = value, "Dialog property");
    }

    fn apply_config(&mut self, config: &DialogConfig) {
        info!(
            title = config.title.as_deref().unwrap_or(""),
            buttons = config.buttons.len(),
            "Dialog configuration applied"
        );
    }

    fn close(&mut self) {
        self.closed = true;
        info!("Dialog closed");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListItemAction {
    Add,
    Update,
    Delete,
}

impl ListItemAction {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "add" => Some(ListItemAction::Add),
            "update" => Some(ListItemAction::Update),
            "delete" => Some(ListItemAction::Delete),
            _ => None,
        }
    }
}

/// Resolve the `listitem` action from its historically inconsistent
/// encodings. The canonical `action` parameter wins; the legacy forms are
/// compatibility aliases with fixed priority:
///
/// 1. explicit `action` parameter (`listitem: action: add, title: X`)
/// 2. bare leading word of the value (`listitem: add, title: X`)
/// 3. bare parameter key (`listitem: add, ...` parsed as a key with no value)
///
/// Default is `update`. A `title` that merely contains the word "add"
/// never influences the action.
fn resolve_list_item_action(command: &Command) -> ListItemAction {
    if let Some(action) = command.param("action").and_then(ListItemAction::parse) {
        return action;
    }

    let value = command.value.trim();
    let leading = match value.find(',') {
        Some(comma) => &value[..comma],
        None => value,
    };
    if let Some(action) = ListItemAction::parse(leading) {
        return action;
    }

    for key in ["add", "update", "delete"] {
        if command.parameters.contains_key(key) {
            if let Some(action) = ListItemAction::parse(key) {
                return action;
            }
        }
    }

    ListItemAction::Update
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CommandParser;

    /// Records every surface effect for assertions.
    #[derive(Default)]
    struct RecordingSurface {
        title: String,
        message: String,
        progress: u32,
        progress_text: String,
        style: String,
        theme: String,
        properties: Vec<(DialogProperty, String)>,
        applied_configs: usize,
        added: Vec<String>,
        updated: Vec<String>,
        removed: Vec<usize>,
        cleared: usize,
        closed: bool,
    }

    impl DialogSurface for RecordingSurface {
        fn set_title(&mut self, title: &str) {
            self.title = title.to_string();
        }
        fn set_message(&mut self, message: &str) {
            self.message = message.to_string();
        }
        fn set_progress(&mut self, value: u32) {
            self.progress = value;
        }
        fn set_progress_text(&mut self, text: &str) {
            self.progress_text = text.to_string();
        }
        fn item_added(&mut self, item: &ListItemConfig) {
            self.added.push(item.title.clone());
        }
        fn item_updated(&mut self, _position: usize, item: &ListItemConfig) {
            self.updated.push(item.title.clone());
        }
        fn item_removed(&mut self, position: usize) {
            self.removed.push(position);
        }
        fn items_cleared(&mut self) {
            self.cleared += 1;
        }
        fn apply_style(&mut self, style: &str) {
            self.style = style.to_string();
        }
        fn apply_theme(&mut self, theme: &str) {
            self.theme = theme.to_string();
        }
        fn set_property(&mut self, property: DialogProperty, value: &str) {
            self.properties.push((property, value.to_string()));
        }
        fn apply_config(&mut self, config: &DialogConfig) {
            self.applied_configs += 1;
            if let Some(title) = &config.title {
                self.title = title.clone();
            }
            if let Some(message) = &config.message {
                self.message = message.clone();
            }
        }
        fn close(&mut self) {
            self.closed = true;
        }
    }

    fn dispatcher() -> CommandDispatcher<RecordingSurface> {
        let (executor, _rx) = ShellExecutor::new();
        CommandDispatcher::new(RecordingSurface::default(), executor)
    }

    fn run(dispatcher: &mut CommandDispatcher<RecordingSurface>, line: &str) -> bool {
        let command = CommandParser::new()
            .parse_line(line)
            .unwrap_or_else(|| panic!("line should parse: {line}"));
        dispatcher.dispatch(&command)
    }

    #[test]
    fn test_title_and_message_replace_text() {
        let mut d = dispatcher();
        assert!(run(&mut d, "title: Install"));
        assert!(run(&mut d, "message: Working"));
        assert_eq!(d.surface().title, "Install");
        assert_eq!(d.surface().message, "Working");
    }

    #[test]
    fn test_progress_clamps_both_ends() {
        let mut d = dispatcher();
        assert!(run(&mut d, "progress: 150"));
        assert_eq!(d.progress(), 100);
        assert_eq!(d.surface().progress, 100);
        assert!(run(&mut d, "progress: -20"));
        assert_eq!(d.progress(), 0);
    }

    #[test]
    fn test_progress_rejects_non_numeric() {
        let mut d = dispatcher();
        assert!(!run(&mut d, "progress: lots"));
        assert_eq!(d.progress(), 0);
    }

    #[test]
    fn test_progress_increment_clamps() {
        let mut d = dispatcher();
        assert!(run(&mut d, "progress: 10"));
        assert!(run(&mut d, "progressincrement: -30"));
        assert_eq!(d.progress(), 0, "clamped, not negative");
        assert!(run(&mut d, "progressincrement: 95"));
        assert_eq!(d.progress(), 95);
        assert!(run(&mut d, "progressincrement: 95"));
        assert_eq!(d.progress(), 100);
    }

    #[test]
    fn test_progress_text_does_not_touch_value() {
        let mut d = dispatcher();
        run(&mut d, "progress: 40");
        run(&mut d, "progresstext: Halfway there");
        assert_eq!(d.progress(), 40);
        assert_eq!(d.surface().progress_text, "Halfway there");
    }

    #[test]
    fn test_progress_reset_uses_placeholder_when_empty() {
        let mut d = dispatcher();
        run(&mut d, "progress: 80");
        assert!(run(&mut d, "progressreset:"));
        assert_eq!(d.progress(), 0);
        assert_eq!(d.surface().progress_text, "Waiting...");

        run(&mut d, "progressreset: Starting over");
        assert_eq!(d.surface().progress_text, "Starting over");
    }

    #[test]
    fn test_quit_closes_surface() {
        let mut d = dispatcher();
        assert!(run(&mut d, "quit:"));
        assert!(d.surface().closed);
    }

    #[test]
    fn test_listitem_add_then_update_converges() {
        let mut d = dispatcher();
        assert!(run(&mut d, "listitem: add, title: Chrome, status: pending"));
        assert!(run(
            &mut d,
            "listitem: title: Chrome, status: success, statustext: Done"
        ));

        assert_eq!(d.items().len(), 1);
        let item = d.items().get(0).unwrap();
        assert_eq!(item.title, "Chrome");
        assert_eq!(item.status, ListItemStatus::Success);
        assert_eq!(item.status_text, "Done");
        assert_eq!(d.surface().added, vec!["Chrome"]);
        assert_eq!(d.surface().updated, vec!["Chrome"]);
    }

    #[test]
    fn test_listitem_add_requires_title() {
        let mut d = dispatcher();
        assert!(!run(&mut d, "listitem: action: add, status: pending"));
        assert!(d.items().is_empty());
    }

    #[test]
    fn test_listitem_canonical_action_parameter_wins() {
        let mut d = dispatcher();
        run(&mut d, "listitem: add, title: One");
        // Leading word says add, canonical action says update; update wins
        // and fails because "Two" does not exist.
        assert!(!run(&mut d, "listitem: add, action: update, title: Two"));
        assert_eq!(d.items().len(), 1);
    }

    #[test]
    fn test_listitem_title_containing_action_word_is_not_an_action() {
        let mut d = dispatcher();
        run(&mut d, "listitem: add, title: add printer driver");
        assert_eq!(d.items().len(), 1);
        // Bare update against that title.
        assert!(run(
            &mut d,
            "listitem: title: add printer driver, status: success"
        ));
        assert_eq!(d.items().len(), 1);
        assert_eq!(d.items().get(0).unwrap().status, ListItemStatus::Success);
    }

    #[test]
    fn test_listitem_update_by_index() {
        let mut d = dispatcher();
        run(&mut d, "listitem: add, title: First");
        run(&mut d, "listitem: add, title: Second");
        assert!(run(&mut d, "listitem: index: 1, status: fail"));
        assert_eq!(
            d.items().get(1).unwrap().status,
            ListItemStatus::Fail
        );
    }

    #[test]
    fn test_listitem_update_miss_is_failure_not_fatal() {
        let mut d = dispatcher();
        assert!(!run(&mut d, "listitem: title: Ghost, status: success"));
        // Subsequent commands still process.
        assert!(run(&mut d, "title: still alive"));
        assert_eq!(d.surface().title, "still alive");
    }

    #[test]
    fn test_listitem_delete() {
        let mut d = dispatcher();
        run(&mut d, "listitem: add, title: Doomed");
        assert!(run(&mut d, "listitem: delete, title: Doomed"));
        assert!(d.items().is_empty());
        assert_eq!(d.surface().removed, vec![0]);
        assert!(!run(&mut d, "listitem: delete, title: Doomed"));
    }

    #[test]
    fn test_list_clear_resets_items_and_counter() {
        let mut d = dispatcher();
        run(&mut d, "listitem: add, title: a");
        run(&mut d, "listitem: add, title: b");
        run(&mut d, "listitem: add, title: c");
        assert_eq!(d.items().len(), 3);

        assert!(run(&mut d, "list: clear"));
        assert!(d.items().is_empty());
        assert_eq!(d.items().next_index(), 0);
        assert_eq!(d.surface().cleared, 1);
    }

    #[test]
    fn test_list_clear_action_parameter_is_case_insensitive() {
        let mut d = dispatcher();
        run(&mut d, "listitem: add, title: a");
        assert!(run(&mut d, "list: action: CLEAR"));
        assert!(d.items().is_empty());
        assert_eq!(d.surface().cleared, 1);
    }

    #[test]
    fn test_list_unknown_action_fails() {
        let mut d = dispatcher();
        assert!(!run(&mut d, "list: action: reverse"));
    }

    #[test]
    fn test_style_and_theme_are_forwarded_opaquely() {
        let mut d = dispatcher();
        run(&mut d, "style: compact");
        run(&mut d, "theme: dark");
        assert_eq!(d.surface().style, "compact");
        assert_eq!(d.surface().theme, "dark");
    }

    #[test]
    fn test_property_verbs_update_dialog_configuration() {
        let mut d = dispatcher();
        run(&mut d, "width: 640");
        run(&mut d, "button1text: OK");
        assert_eq!(
            d.surface().properties,
            vec![
                (DialogProperty::Width, "640".to_string()),
                (DialogProperty::Button1Text, "OK".to_string()),
            ]
        );
    }

    #[test]
    fn test_valid_inline_config_applies_wholesale() {
        let mut d = dispatcher();
        let line = r#"config: {"title": "Deploy", "message": "Go", "progress": {"value": 30}, "listItems": [{"title": "Step 1", "status": "pending"}]}"#;
        assert!(run(&mut d, line));
        assert_eq!(d.surface().applied_configs, 1);
        assert_eq!(d.surface().title, "Deploy");
        assert_eq!(d.progress(), 30);
        assert_eq!(d.items().len(), 1);
        assert_eq!(d.items().get(0).unwrap().status, ListItemStatus::Pending);
    }

    #[test]
    fn test_config_progress_scales_custom_maximum() {
        let mut d = dispatcher();
        let line = r#"config: {"title": "T", "message": "M", "progress": {"value": 120, "maximum": 200}}"#;
        assert!(run(&mut d, line));
        assert_eq!(d.progress(), 60);
    }

    #[test]
    fn test_config_progress_scaling_survives_large_values() {
        let mut d = dispatcher();
        // Byte-count style ranges pass validation; the scale must not
        // overflow i32 on the way to a percentage.
        let line = r#"config: {"title": "T", "message": "M", "progress": {"value": 30000000, "maximum": 100000000}}"#;
        assert!(run(&mut d, line));
        assert_eq!(d.progress(), 30);

        let line = r#"config: {"title": "T", "message": "M", "progress": {"value": 2000000000, "maximum": 2000000000}}"#;
        assert!(run(&mut d, line));
        assert_eq!(d.progress(), 100);
    }

    #[test]
    fn test_invalid_config_is_rejected_atomically() {
        let mut d = dispatcher();
        run(&mut d, "title: before");
        run(&mut d, "listitem: add, title: keep me");

        let line = r#"config: {"title": "After", "message": "M", "buttons": [
            {"text": "A", "action": "a", "isDefault": true},
            {"text": "B", "action": "b", "isDefault": true}
        ]}"#
        .replace('\n', " ");
        assert!(!run(&mut d, &line));

        // No partial application: nothing changed.
        assert_eq!(d.surface().applied_configs, 0);
        assert_eq!(d.surface().title, "before");
        assert_eq!(d.items().len(), 1);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialog.json");
        std::fs::write(&path, r#"{"title": "FromFile", "message": "M"}"#).unwrap();

        let mut d = dispatcher();
        assert!(run(&mut d, &format!("config: {}", path.display())));
        assert_eq!(d.surface().title, "FromFile");

        assert!(!run(&mut d, "config: /no/such/file.json"));
    }

    #[test]
    fn test_execute_success_flag_becomes_command_outcome() {
        let mut d = dispatcher();
        assert!(run(&mut d, "execute: echo ok"));
        assert!(!run(&mut d, "execute: exit 9"));
        assert!(run(&mut d, "executeoutput: echo captured"));
    }

    #[test]
    fn test_execute_respects_configured_timeout() {
        let (executor, _rx) = ShellExecutor::new();
        let mut d = CommandDispatcher::new(RecordingSurface::default(), executor)
            .with_exec_timeout(Duration::from_millis(200));
        assert!(!run(&mut d, "execute: sleep 5"));
    }
}
