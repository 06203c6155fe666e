//! Command file monitor.
//!
//! Tails a shared append-only command file that external scripts write to,
//! and delivers parsed commands in file order. Filesystem notifications for
//! a single logical append often arrive in bursts (buffered writers, several
//! small writes), so the monitor debounces: each notification re-arms a
//! short quiet window, and one read pass runs per quiet period. The read
//! cursor is the only shared mutable state and is guarded by one lock that
//! `clear()` shares with the read passes.
//!
//! Delivery contract: within one file, commands reach the subscriber in
//! line order, at least once, with no drops. An I/O failure during a pass
//! leaves the cursor untouched so the next pass retries the same bytes.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use notify::{recommended_watcher, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::error::{DialogError, Result};
use crate::parser::CommandParser;

/// Quiet window after the last notification before a read pass runs.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Event emitted by the monitor toward the dispatcher.
#[derive(Debug)]
pub enum MonitorEvent {
    /// A line parsed into a command, in file order.
    CommandReceived(Command),
    /// A non-fatal I/O or watcher problem; monitoring continues.
    Error { message: String },
}

/// Internal signal from the notify callback to the debounce loop.
enum Signal {
    Changed,
    Stop,
}

/// State shared between the public handle, the debounce thread, and `clear()`.
struct Shared {
    path: PathBuf,
    /// Byte offset of consumed content. Advanced only after a successful
    /// read, reset by `clear()`, seeded at EOF on start.
    cursor: Mutex<u64>,
    events: Sender<MonitorEvent>,
    parser: CommandParser,
    monitoring: AtomicBool,
    /// Completed read passes; observable debounce behavior for diagnostics.
    passes: AtomicU64,
}

/// One active monitoring session: the watcher subscription plus the
/// debounce thread consuming its notifications.
struct Session {
    shared: Arc<Shared>,
    // Held to keep the OS subscription alive; dropped on stop.
    _watcher: RecommendedWatcher,
    signal_tx: Sender<Signal>,
    debounce_thread: Option<thread::JoinHandle<()>>,
}

/// Monitors a command file and emits [`MonitorEvent`]s.
pub struct CommandFileMonitor {
    parser: CommandParser,
    events: Sender<MonitorEvent>,
    session: Option<Session>,
}

impl CommandFileMonitor {
    /// Create a monitor. Commands and errors arrive on the returned receiver
    /// once [`start`](Self::start) is called.
    pub fn new(parser: CommandParser) -> (Self, Receiver<MonitorEvent>) {
        let (tx, rx) = channel();
        (
            Self {
                parser,
                events: tx,
                session: None,
            },
            rx,
        )
    }

    /// Start monitoring `path`, creating the file (with a header comment)
    /// and its parent directories if absent. Pre-existing content is not
    /// replayed: the cursor is seeded at the current end of file.
    ///
    /// Calling `start` while already monitoring stops the previous session
    /// first. This is the only fatal path in the engine: failure to create
    /// or watch the file is returned as a hard error.
    pub fn start(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.stop();

        let path = resolve_path(path.as_ref())?;
        create_command_file(&path)?;

        let initial_len = fs::metadata(&path)?.len();
        let shared = Arc::new(Shared {
            path: path.clone(),
            cursor: Mutex::new(initial_len),
            events: self.events.clone(),
            parser: self.parser,
            monitoring: AtomicBool::new(true),
            passes: AtomicU64::new(0),
        });

        let (signal_tx, signal_rx) = channel();

        // Watch the parent directory non-recursively and filter to our one
        // file; watching the file itself breaks on editors that replace it.
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| DialogError::InvalidPath {
                path: path.display().to_string(),
            })?;
        let notify_tx = signal_tx.clone();
        let error_tx = self.events.clone();
        let mut watcher =
            recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    let relevant = matches!(
                        event.kind,
                        notify::EventKind::Create(_) | notify::EventKind::Modify(_)
                    );
                    if ours && relevant {
                        let _ = notify_tx.send(Signal::Changed);
                    }
                }
                Err(e) => {
                    let _ = error_tx.send(MonitorEvent::Error {
                        message: format!("file watcher error: {e}"),
                    });
                }
            })?;

        let watch_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        let loop_shared = shared.clone();
        let debounce_thread = thread::spawn(move || debounce_loop(loop_shared, signal_rx));

        info!(
            path = %path.display(),
            cursor = initial_len,
            "Command file monitor started"
        );

        self.session = Some(Session {
            shared,
            _watcher: watcher,
            signal_tx,
            debounce_thread: Some(debounce_thread),
        });
        Ok(())
    }

    /// Stop monitoring: unsubscribe from notifications, cancel the pending
    /// debounce window, and discard queued notifications. Safe to call
    /// repeatedly.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.shared.monitoring.store(false, Ordering::SeqCst);
            let _ = session.signal_tx.send(Signal::Stop);
            if let Some(handle) = session.debounce_thread.take() {
                let _ = handle.join();
            }
            info!(path = %session.shared.path.display(), "Command file monitor stopped");
        }
    }

    /// Truncate the command file and reset the read cursor to 0.
    pub fn clear(&self) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let shared = &session.shared;
        // Same lock as the read passes, so a pass cannot interleave with
        // the truncate-and-reset.
        let mut cursor = shared.cursor.lock();
        fs::write(&shared.path, b"")?;
        *cursor = 0;
        debug!(path = %shared.path.display(), "Command file cleared");
        Ok(())
    }

    /// Whether notifications are currently subscribed.
    pub fn is_monitoring(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.shared.monitoring.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// The resolved path of the monitored file, if monitoring.
    pub fn command_file_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.shared.path.as_path())
    }

    /// Completed read passes for the current session. Each pass covers one
    /// debounced burst of notifications.
    pub fn passes(&self) -> u64 {
        self.session
            .as_ref()
            .map(|s| s.shared.passes.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl Drop for CommandFileMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Expand `~` and require a resolvable parent directory.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.file_name().is_none() || path.parent().is_none() {
        return Err(DialogError::InvalidPath {
            path: path.display().to_string(),
        });
    }
    Ok(path)
}

/// Create the command file with a header comment if it does not exist.
fn create_command_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let header = format!(
            "# rdialog command file created at {}\n# Commands will be processed as they are appended to this file\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        fs::write(path, header)?;
    }
    Ok(())
}

/// Consumes change signals and runs one read pass per quiet period.
///
/// A signal arms the quiet window; further signals inside the window re-arm
/// it. Coalescing never reorders anything, it only delays the start of the
/// next linear scan.
fn debounce_loop(shared: Arc<Shared>, signals: Receiver<Signal>) {
    loop {
        // Idle: block until something changes or the session ends.
        match signals.recv() {
            Ok(Signal::Changed) => {}
            Ok(Signal::Stop) | Err(_) => break,
        }

        // Armed: wait for the burst to go quiet.
        loop {
            match signals.recv_timeout(DEBOUNCE_WINDOW) {
                Ok(Signal::Changed) => continue,
                Ok(Signal::Stop) => return,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        run_read_pass(&shared);
    }
}

/// One pass: read cursor..EOF under the cursor lock, then hand each
/// non-blank line to the parser and forward the results.
fn run_read_pass(shared: &Shared) {
    let lines = {
        let mut cursor = shared.cursor.lock();
        match read_new_lines(&shared.path, &mut cursor) {
            Ok(lines) => lines,
            Err(e) => {
                // Cursor untouched; the next debounced pass retries.
                warn!(path = %shared.path.display(), error = %e, "Read pass failed");
                let _ = shared.events.send(MonitorEvent::Error {
                    message: format!("error reading command file: {e}"),
                });
                return;
            }
        }
    };

    shared.passes.fetch_add(1, Ordering::SeqCst);

    for line in lines {
        // Unparseable lines are dropped silently, not errors.
        if let Some(command) = shared.parser.parse_line(&line) {
            debug!(verb = %command.verb, raw = %command.raw, "Command received");
            if shared
                .events
                .send(MonitorEvent::CommandReceived(command))
                .is_err()
            {
                // Subscriber gone; nothing left to deliver to.
                return;
            }
        }
    }
}

/// Read from `cursor` to EOF, returning complete non-blank lines and
/// advancing the cursor. Self-heals when the file shrank underneath us.
fn read_new_lines(path: &Path, cursor: &mut u64) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let len = fs::metadata(path)?.len();
    if len < *cursor {
        // External truncation; treat current length as already consumed.
        *cursor = len;
        return Ok(Vec::new());
    }
    if len == *cursor {
        return Ok(Vec::new());
    }

    let mut file = open_shared(path)?;
    file.seek(SeekFrom::Start(*cursor))?;
    let mut buf = Vec::with_capacity((len - *cursor) as usize);
    file.read_to_end(&mut buf)?;
    let new_cursor = *cursor + buf.len() as u64;

    let text = String::from_utf8_lossy(&buf);
    let lines = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    *cursor = new_cursor;
    Ok(lines)
}

/// Open for read while tolerating a writer holding the file open.
fn open_shared(path: &Path) -> std::io::Result<File> {
    // std's default share mode on Windows already allows concurrent
    // readers and writers; read-only open is enough on every platform.
    OpenOptions::new().read(true).open(path)
}
