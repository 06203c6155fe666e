//! Command file line parser.
//!
//! Pure translation of one raw text line into zero-or-one [`Command`] using
//! the swiftDialog-compatible `verb: value` syntax. Parsing never fails:
//! comments, blank lines, missing colons, and unknown verbs all simply
//! produce nothing, and malformed `key: value` sub-fields yield fewer
//! parameters rather than an error.

use std::time::Instant;

use crate::command::{Command, Verb};

/// Stateless line parser. Constructed once and handed to the monitor.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single command line.
    ///
    /// Returns `None` for comments, blank lines, lines without a `:`
    /// separator, and verbs outside the fixed vocabulary.
    pub fn parse_line(&self, line: &str) -> Option<Command> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let colon = trimmed.find(':')?;
        let verb = Verb::parse(&trimmed[..colon])?;
        let value = trimmed[colon + 1..].trim().to_string();

        let mut command = Command {
            verb,
            parameters: Default::default(),
            raw: line.to_string(),
            value,
            received_at: Instant::now(),
        };

        if matches!(verb, Verb::ListItem | Verb::List) {
            parse_parameters(&mut command);
        }

        Some(command)
    }

    /// Parse a batch of lines, dropping everything that is not a command.
    pub fn parse_lines<'a, I>(&self, lines: I) -> Vec<Command>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    /// Whether a line would produce a command.
    pub fn is_valid_command(&self, line: &str) -> bool {
        self.parse_line(line).is_some()
    }
}

/// Split a `listitem`/`list` value into comma-separated `key: value`
/// sub-fields.
fn parse_parameters(command: &mut Command) {
    let value = command.value.trim().to_string();
    if value.is_empty() {
        return;
    }

    // `list: clear` is a fixed form, not a key/value blob.
    if command.verb == Verb::List && value.eq_ignore_ascii_case("clear") {
        command
            .parameters
            .insert("action".to_string(), "clear".to_string());
        return;
    }

    for segment in value.split(',') {
        let segment = segment.trim();
        let Some(colon) = segment.find(':') else {
            continue;
        };
        if colon == 0 {
            continue;
        }
        let key = segment[..colon].trim().to_ascii_lowercase();
        let mut param_value = segment[colon + 1..].trim();
        // Strip one layer of surrounding double quotes.
        if param_value.len() >= 2 && param_value.starts_with('"') && param_value.ends_with('"') {
            param_value = &param_value[1..param_value.len() - 1];
        }
        command.parameters.insert(key, param_value.to_string());
    }

    // Backward-compatible bare form: `listitem: Install Chrome`.
    if command.parameters.is_empty() && command.verb == Verb::ListItem {
        command.parameters.insert("title".to_string(), value);
    }
}
