//! Command model for the command-file protocol.
//!
//! A [`Command`] is the parsed unit of work flowing from the command file to
//! the dispatcher: a verb from a fixed vocabulary, a free-form value, and
//! (for `listitem`/`list`) a set of key/value parameters.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// The fixed command vocabulary, swiftDialog-compatible.
///
/// Unknown verbs are never represented here; the parser drops them at parse
/// time so forward-compatible scripts cannot crash the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Title,
    Message,
    Progress,
    ProgressText,
    ProgressIncrement,
    ProgressReset,
    Quit,
    ListItem,
    List,
    Config,
    Style,
    Theme,
    Execute,
    ExecutePowerShell,
    ExecuteOutput,
    Width,
    Height,
    Position,
    Icon,
    Image,
    Button1Text,
    Button2Text,
}

impl Verb {
    /// Parse a verb token case-insensitively. Returns `None` for anything
    /// outside the fixed vocabulary.
    pub fn parse(token: &str) -> Option<Self> {
        let verb = match token.trim().to_ascii_lowercase().as_str() {
            "title" => Verb::Title,
            "message" => Verb::Message,
            "progress" => Verb::Progress,
            "progresstext" => Verb::ProgressText,
            "progressincrement" => Verb::ProgressIncrement,
            "progressreset" => Verb::ProgressReset,
            "quit" => Verb::Quit,
            "listitem" => Verb::ListItem,
            "list" => Verb::List,
            "config" => Verb::Config,
            "style" => Verb::Style,
            "theme" => Verb::Theme,
            "execute" => Verb::Execute,
            "executepowershell" => Verb::ExecutePowerShell,
            "executeoutput" => Verb::ExecuteOutput,
            "width" => Verb::Width,
            "height" => Verb::Height,
            "position" => Verb::Position,
            "icon" => Verb::Icon,
            "image" => Verb::Image,
            "button1text" => Verb::Button1Text,
            "button2text" => Verb::Button2Text,
            _ => return None,
        };
        Some(verb)
    }

    /// The canonical lower-case spelling used in the command file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Title => "title",
            Verb::Message => "message",
            Verb::Progress => "progress",
            Verb::ProgressText => "progresstext",
            Verb::ProgressIncrement => "progressincrement",
            Verb::ProgressReset => "progressreset",
            Verb::Quit => "quit",
            Verb::ListItem => "listitem",
            Verb::List => "list",
            Verb::Config => "config",
            Verb::Style => "style",
            Verb::Theme => "theme",
            Verb::Execute => "execute",
            Verb::ExecutePowerShell => "executepowershell",
            Verb::ExecuteOutput => "executeoutput",
            Verb::Width => "width",
            Verb::Height => "height",
            Verb::Position => "position",
            Verb::Icon => "icon",
            Verb::Image => "image",
            Verb::Button1Text => "button1text",
            Verb::Button2Text => "button2text",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed command line.
#[derive(Debug, Clone)]
pub struct Command {
    /// The command verb.
    pub verb: Verb,
    /// Everything after the first `:`, trimmed. Verb-specific meaning.
    pub value: String,
    /// Lower-cased key → value sub-fields, populated for `listitem`/`list`.
    pub parameters: HashMap<String, String>,
    /// The original unmodified line, kept for diagnostics.
    pub raw: String,
    /// Monotonic capture time; orders commands within this process.
    pub received_at: Instant,
}

impl Command {
    /// Build a command programmatically, e.g. from the dialog-state owner's
    /// own convenience API. Scripts normally go through the parser instead.
    pub fn new(verb: Verb, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            raw: format!("{}: {}", verb.as_str(), value),
            verb,
            value,
            parameters: HashMap::new(),
            received_at: Instant::now(),
        }
    }

    /// Parameter lookup by lower-cased key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_parse_is_case_insensitive() {
        assert_eq!(Verb::parse("TITLE"), Some(Verb::Title));
        assert_eq!(Verb::parse("ProgressText"), Some(Verb::ProgressText));
        assert_eq!(Verb::parse(" listitem "), Some(Verb::ListItem));
    }

    #[test]
    fn test_verb_parse_rejects_unknown() {
        assert_eq!(Verb::parse("explode"), None);
        assert_eq!(Verb::parse(""), None);
    }

    #[test]
    fn test_verb_round_trips_through_as_str() {
        for verb in [
            Verb::Title,
            Verb::ProgressIncrement,
            Verb::ExecutePowerShell,
            Verb::Button2Text,
        ] {
            assert_eq!(Verb::parse(verb.as_str()), Some(verb));
        }
    }

    #[test]
    fn test_command_new_keeps_raw_form() {
        let cmd = Command::new(Verb::Title, "Hello");
        assert_eq!(cmd.raw, "title: Hello");
        assert_eq!(cmd.value, "Hello");
        assert!(cmd.parameters.is_empty());
    }

    #[test]
    fn test_command_param_lookup() {
        let cmd = Command::new(Verb::ListItem, "").with_param("title", "Chrome");
        assert_eq!(cmd.param("title"), Some("Chrome"));
        assert_eq!(cmd.param("status"), None);
    }
}
