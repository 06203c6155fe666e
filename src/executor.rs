//! Subprocess execution with streamed output, timeouts, and group kill.
//!
//! Commands from `execute`/`executepowershell`/`executeoutput` run through
//! a shell with stdout/stderr redirected. Output lines are forwarded as
//! they arrive (unless capture-only), full buffers are accumulated for the
//! result, and a wall-clock timeout force-kills the process tree. Launch
//! failures and timeouts never surface as errors to the caller: everything
//! folds into the returned [`ExecutionResult`].

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Default wall-clock budget for one subprocess.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting for a child to exit.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Substrings that mark a command as destructive. Advisory only: a match
/// logs a warning, it does not block execution.
const UNSAFE_COMMANDS: &[&str] = &[
    "format", "del", "rmdir", "rd", "erase", "attrib", "fdisk", "diskpart", "shutdown", "restart",
    "reboot", "net user", "net localgroup", "reg delete", "reg add", "sc delete", "taskkill",
    "wmic", "powercfg", "bcdedit",
];

/// Which interpreter runs the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// The system command shell: `cmd /c` on Windows, `sh -c` elsewhere.
    System,
    /// `powershell -Command`.
    PowerShell,
}

impl ShellKind {
    /// Interpreter binary and the argument introducing the command string.
    fn launcher(&self) -> (&'static str, &'static str) {
        match self {
            #[cfg(windows)]
            ShellKind::System => ("cmd", "/c"),
            #[cfg(not(windows))]
            ShellKind::System => ("sh", "-c"),
            ShellKind::PowerShell => ("powershell", "-Command"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShellKind::System => "system",
            ShellKind::PowerShell => "powershell",
        }
    }
}

/// One line of subprocess output, streamed as it arrives.
#[derive(Debug, Clone)]
pub struct OutputEvent {
    pub command: String,
    pub line: String,
    pub is_error: bool,
}

/// Immutable record of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub command: String,
    pub shell: ShellKind,
    /// None when the process was killed or never launched.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs external commands for the dispatcher.
pub struct ShellExecutor {
    output: Sender<OutputEvent>,
}

impl ShellExecutor {
    /// Create an executor. Streaming output lines arrive on the returned
    /// receiver; dropping it silently disables streaming.
    pub fn new() -> (Self, Receiver<OutputEvent>) {
        let (tx, rx) = channel();
        (Self { output: tx }, rx)
    }

    /// Run through the system shell, streaming output.
    pub fn execute(
        &self,
        command: &str,
        working_dir: Option<&PathBuf>,
        timeout: Duration,
    ) -> ExecutionResult {
        self.run(command, ShellKind::System, working_dir, timeout, false)
    }

    /// Run through PowerShell, streaming output.
    pub fn execute_powershell(
        &self,
        script: &str,
        working_dir: Option<&PathBuf>,
        timeout: Duration,
    ) -> ExecutionResult {
        self.run(script, ShellKind::PowerShell, working_dir, timeout, false)
    }

    /// Run through the system shell, capturing output without streaming
    /// events. The result shape is identical to [`execute`](Self::execute).
    pub fn execute_and_capture(
        &self,
        command: &str,
        working_dir: Option<&PathBuf>,
        timeout: Duration,
    ) -> ExecutionResult {
        self.run(command, ShellKind::System, working_dir, timeout, true)
    }

    fn run(
        &self,
        command: &str,
        shell: ShellKind,
        working_dir: Option<&PathBuf>,
        timeout: Duration,
        capture_only: bool,
    ) -> ExecutionResult {
        if !is_command_safe(command) {
            // Policy decision: advisory check, execution proceeds.
            warn!(command = command, "Command matches destructive-operation blacklist");
        }

        let started_at = Utc::now();
        let mut result = ExecutionResult {
            command: command.to_string(),
            shell,
            exit_code: None,
            success: false,
            timed_out: false,
            stdout: String::new(),
            stderr: String::new(),
            started_at,
            finished_at: started_at,
        };

        let (program, flag) = shell.launcher();
        let mut process = ProcessCommand::new(program);
        process
            .arg(flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            process.current_dir(dir);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group so a timeout kill reaps children too.
            process.process_group(0);
        }

        debug!(shell = shell.as_str(), command = command, "Spawning subprocess");
        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(e) => {
                // Launch failure: interpreter missing, permission denied.
                warn!(shell = shell.as_str(), error = %e, "Failed to launch subprocess");
                result.stderr = e.to_string();
                result.finished_at = Utc::now();
                return result;
            }
        };

        let stdout_reader = child
            .stdout
            .take()
            .map(|out| self.spawn_reader(out, command, false, capture_only));
        let stderr_reader = child
            .stderr
            .take()
            .map(|err| self.spawn_reader(err, command, true, capture_only));

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    result.exit_code = status.code();
                    result.success = status.success();
                    break;
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        result.timed_out = true;
                        result.success = false;
                        kill_process_tree(&mut child);
                        break;
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(e) => {
                    result.stderr = e.to_string();
                    result.success = false;
                    break;
                }
            }
        }

        if let Some(handle) = stdout_reader {
            if let Ok(captured) = handle.join() {
                result.stdout = captured;
            }
        }
        if let Some(handle) = stderr_reader {
            if let Ok(captured) = handle.join() {
                if result.stderr.is_empty() {
                    result.stderr = captured;
                }
            }
        }

        result.finished_at = Utc::now();
        info!(
            shell = shell.as_str(),
            exit_code = ?result.exit_code,
            success = result.success,
            timed_out = result.timed_out,
            duration_ms = result.duration().num_milliseconds(),
            "Subprocess finished"
        );
        result
    }

    /// Drain one output pipe on its own thread, emitting each line as it
    /// arrives and returning the accumulated buffer.
    fn spawn_reader<R: Read + Send + 'static>(
        &self,
        pipe: R,
        command: &str,
        is_error: bool,
        capture_only: bool,
    ) -> thread::JoinHandle<String> {
        let events = self.output.clone();
        let command = command.to_string();
        thread::spawn(move || {
            let mut captured = String::new();
            for line in BufReader::new(pipe).lines() {
                let Ok(line) = line else { break };
                captured.push_str(&line);
                captured.push('\n');
                if !capture_only {
                    let _ = events.send(OutputEvent {
                        command: command.clone(),
                        line,
                        is_error,
                    });
                }
            }
            captured
        })
    }
}

/// Kill the child and its descendants.
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) {
    let pid = child.id();
    // The child leads its own process group; a negative pid targets the group.
    let group = format!("-{pid}");
    // "--" is required so kill parses the negative pid as a group, not a flag.
    match ProcessCommand::new("kill").args(["-9", "--", &group]).output() {
        Ok(output) if output.status.success() => {
            debug!(pid, "Killed subprocess group after timeout");
        }
        Ok(_) | Err(_) => {
            // Group kill unavailable; fall back to the direct child.
            let _ = child.kill();
        }
    }
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) {
    let pid = child.id().to_string();
    // /T walks the child process tree, matching the unix group kill.
    match ProcessCommand::new("taskkill")
        .args(["/F", "/T", "/PID", &pid])
        .output()
    {
        Ok(output) if output.status.success() => {
            debug!(pid = %pid, "Killed subprocess tree after timeout");
        }
        Ok(_) | Err(_) => {
            // taskkill unavailable; fall back to the direct child.
            let _ = child.kill();
        }
    }
    let _ = child.wait();
}

/// Advisory check against a fixed blacklist of destructive operations.
pub fn is_command_safe(command: &str) -> bool {
    if command.trim().is_empty() {
        return false;
    }
    let lower = command.to_ascii_lowercase();
    !UNSAFE_COMMANDS.iter().any(|unsafe_cmd| lower.contains(unsafe_cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> (ShellExecutor, Receiver<OutputEvent>) {
        ShellExecutor::new()
    }

    #[test]
    fn test_successful_command_captures_stdout() {
        let (exec, _rx) = executor();
        let result = exec.execute("echo hello", None, DEFAULT_TIMEOUT);
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(!result.timed_out);
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let (exec, _rx) = executor();
        let result = exec.execute("exit 3", None, DEFAULT_TIMEOUT);
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(!result.timed_out);
    }

    #[test]
    fn test_stderr_is_captured_separately() {
        let (exec, _rx) = executor();
        let result = exec.execute("echo oops 1>&2", None, DEFAULT_TIMEOUT);
        assert!(result.stderr.contains("oops"));
        assert!(!result.stdout.contains("oops"));
    }

    #[test]
    fn test_streaming_emits_output_events() {
        let (exec, rx) = executor();
        let result = exec.execute("echo first && echo second", None, DEFAULT_TIMEOUT);
        assert!(result.success);
        let lines: Vec<OutputEvent> = rx.try_iter().collect();
        assert!(lines.iter().any(|e| e.line == "first" && !e.is_error));
        assert!(lines.iter().any(|e| e.line == "second"));
    }

    #[test]
    fn test_capture_only_suppresses_streaming() {
        let (exec, rx) = executor();
        let result = exec.execute_and_capture("echo quiet", None, DEFAULT_TIMEOUT);
        assert!(result.success);
        assert!(result.stdout.contains("quiet"));
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn test_timeout_kills_the_process() {
        let (exec, _rx) = executor();
        let started = Instant::now();
        let result = exec.execute("sleep 5", None, Duration::from_millis(200));
        assert!(result.timed_out);
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
        // Killed well before the sleep would have finished.
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(windows)]
    #[test]
    fn test_timeout_kills_grandchildren_too() {
        let (exec, _rx) = executor();
        let started = Instant::now();
        // cmd /c runs ping as a grandchild that holds the output pipe; the
        // kill must take down the whole tree or the reader join blocks
        // until ping finishes on its own.
        let result = exec.execute("ping -n 10 127.0.0.1", None, Duration::from_millis(500));
        assert!(result.timed_out);
        assert!(!result.success);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_launch_failure_is_folded_into_result() {
        let (exec, _rx) = executor();
        let result = exec.run(
            "echo hi",
            ShellKind::PowerShell,
            None,
            DEFAULT_TIMEOUT,
            true,
        );
        // On hosts without powershell this is a launch failure; either way
        // it must not panic and must carry a result.
        if !result.success {
            assert!(!result.stderr.is_empty() || result.exit_code.is_some());
        }
    }

    #[test]
    fn test_working_directory_is_applied() {
        let (exec, _rx) = executor();
        let dir = tempfile::tempdir().unwrap();
        let result = exec.execute("pwd", Some(&dir.path().to_path_buf()), DEFAULT_TIMEOUT);
        assert!(result.success);
        let printed = result.stdout.trim();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(printed).canonicalize().unwrap(),
            expected
        );
    }

    #[test]
    fn test_unsafe_command_detection() {
        assert!(!is_command_safe("format c:"));
        assert!(!is_command_safe("shutdown /s"));
        assert!(!is_command_safe("REG DELETE HKLM\\Software"));
        assert!(!is_command_safe(""));
        assert!(is_command_safe("echo hello"));
        assert!(is_command_safe("copy a.txt b.txt"));
    }

    #[test]
    fn test_unsafe_command_still_executes() {
        let (exec, _rx) = executor();
        // "restart" is blacklisted as a substring; the echo still runs.
        let result = exec.execute("echo restart pending", None, DEFAULT_TIMEOUT);
        assert!(result.success);
        assert!(result.stdout.contains("restart pending"));
    }

    #[test]
    fn test_duration_is_not_negative() {
        let (exec, _rx) = executor();
        let result = exec.execute("echo x", None, DEFAULT_TIMEOUT);
        assert!(result.duration().num_milliseconds() >= 0);
    }
}
