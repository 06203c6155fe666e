//! rdialog binary: tail a command file and dispatch its commands.
//!
//! Runs the protocol engine headlessly against a [`TracingSurface`]; a
//! windowed frontend plugs in by swapping the surface implementation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use rdialog::config;
use rdialog::dispatcher::{CommandDispatcher, DialogSurface, TracingSurface};
use rdialog::executor::ShellExecutor;
use rdialog::logging;
use rdialog::monitor::{CommandFileMonitor, MonitorEvent};
use rdialog::parser::CommandParser;

/// Scriptable dialog driven by a shared command file.
#[derive(Debug, Parser)]
#[command(name = "rdialog", version, about)]
struct Args {
    /// Command file to monitor. Created if it does not exist.
    #[arg(long = "commandfile", default_value = "~/.rdialog/commands.log")]
    command_file: String,

    /// JSON configuration applied before monitoring starts.
    #[arg(long = "jsonfile")]
    json_file: Option<PathBuf>,

    /// Initial dialog title.
    #[arg(long)]
    title: Option<String>,

    /// Initial dialog message.
    #[arg(long)]
    message: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let _guard = logging::init();
    let args = Args::parse();

    let (executor, output_rx) = ShellExecutor::new();
    let mut dispatcher = CommandDispatcher::new(TracingSurface::new(), executor);

    if let Some(path) = &args.json_file {
        let config = config::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?;
        if !dispatcher.apply_config(&config) {
            anyhow::bail!("configuration {} failed validation", path.display());
        }
    }
    if let Some(title) = &args.title {
        dispatcher.surface_mut().set_title(title);
    }
    if let Some(message) = &args.message {
        dispatcher.surface_mut().set_message(message);
    }

    let (mut monitor, events) = CommandFileMonitor::new(CommandParser::new());
    monitor
        .start(&args.command_file)
        .with_context(|| format!("monitoring command file {}", args.command_file))?;

    info!(
        command_file = %args.command_file,
        "rdialog running; append commands to the file, `quit:` exits"
    );

    while let Ok(event) = events.recv() {
        match event {
            MonitorEvent::CommandReceived(command) => {
                dispatcher.dispatch(&command);
                // Surface subprocess output produced by execute verbs.
                for output in output_rx.try_iter() {
                    if output.is_error {
                        warn!(command = %output.command, line = %output.line, "Subprocess stderr");
                    } else {
                        info!(command = %output.command, line = %output.line, "Subprocess stdout");
                    }
                }
                if dispatcher.surface().is_closed() {
                    break;
                }
            }
            MonitorEvent::Error { message } => {
                warn!(error = %message, "Monitor error");
            }
        }
    }

    monitor.stop();
    Ok(())
}
