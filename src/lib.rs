//! rdialog - command-file driven dialog engine
//!
//! This library provides the protocol core of a scriptable dialog: a
//! swiftDialog-style command file is tailed for `verb: value` lines,
//! parsed into commands, and dispatched against a [`dispatcher::DialogSurface`]
//! implementation that owns the actual window.

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod list_item;
pub mod logging;
pub mod monitor;
pub mod parser;
