//! Bulk JSON dialog configuration.
//!
//! A single JSON document can replace many individual line-commands at
//! once, consumed through the `config` verb or loaded directly from a file
//! at startup. Unknown fields are ignored for forward compatibility, and a
//! document is applied wholesale only after validation passes.
//!
//! # Module Structure
//!
//! - `types` - Configuration struct definitions (DialogConfig, ButtonConfig, ...)
//! - `validate` - Structural and semantic validation
//! - `loader` - Parsing from strings and files

mod loader;
mod types;
mod validate;

pub use loader::{from_file, from_str};
pub use types::{
    AnimationConfig, BehaviorConfig, ButtonConfig, DialogConfig, ListItemEntry, ProgressConfig,
    StylingConfig,
};
pub use validate::{validate, ValidationReport};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
