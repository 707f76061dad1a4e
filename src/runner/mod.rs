//! Process runner: execute one test binary under a timeout and capture what it printed.
//!
//! ## Contract
//!
//! - Never panics or returns an error for an ordinary failure. Every fault (missing binary, spawn error,
//!   timeout, signal) is folded into the returned [`ExecutionOutcome`].
//! - Batch mode attaches no input (stdin is at EOF). Interactive mode writes the whole script up front and
//!   closes stdin; there is no read/write interleaving with the child.
//! - The wait is bounded: a child still running at its deadline is killed and reaped.

pub mod capture;

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use harness_core::case::stdin_payload;
use harness_core::{ExecutionOutcome, ProcessFault};
use wait_timeout::ChildExt;

use self::capture::StreamCapture;

/// How long reader threads may keep draining after the child has been reaped.
pub const DEFAULT_READER_GRACE: Duration = Duration::from_millis(500);

/// Run a binary and capture its output.
///
/// This is the seam between the suite orchestrator and the operating system; tests substitute scripted
/// implementations.
pub trait ProcessRunner {
    /// Run `binary` with no arguments.
    ///
    /// `input_lines` selects the mode: `None` for batch, `Some(lines)` for interactive.
    fn run(&self, binary: &Path, input_lines: Option<&[String]>, timeout: Duration) -> ExecutionOutcome;
}

/// Runs binaries as real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    reader_grace: Duration,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self {
            reader_grace: DEFAULT_READER_GRACE,
        }
    }
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long after the child is reaped its output pipes may stay open before the capture is cut off.
    pub fn with_reader_grace(mut self, grace: Duration) -> Self {
        self.reader_grace = grace;
        self
    }
}

impl ProcessRunner for SystemRunner {
    #[tracing::instrument(skip_all, fields(binary = %binary.display(), timeout_ms = timeout.as_millis() as u64))]
    fn run(&self, binary: &Path, input_lines: Option<&[String]>, timeout: Duration) -> ExecutionOutcome {
        let start = Instant::now();

        if !binary.is_file() {
            tracing::debug!("binary does not exist; not spawning");
            return ExecutionOutcome::not_found(binary);
        }

        let mut child = match spawn(binary, input_lines.is_some()) {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(error = %e, "failed to spawn test binary");
                return ExecutionOutcome::fault(ProcessFault::Exception(e.to_string())).with_elapsed(start.elapsed());
            }
        };

        let stdout = child
            .stdout
            .take()
            .map_or_else(StreamCapture::empty, |pipe| StreamCapture::spawn(pipe, "stdout"));
        let stderr = child
            .stderr
            .take()
            .map_or_else(StreamCapture::empty, |pipe| StreamCapture::spawn(pipe, "stderr"));

        if let (Some(lines), Some(stdin)) = (input_lines, child.stdin.take()) {
            feed_stdin(stdin, stdin_payload(lines));
        }

        let waited = wait_bounded(&mut child, timeout);

        let reader_deadline = Instant::now() + self.reader_grace;
        let stdout = stdout.finish(reader_deadline);
        let stderr = stderr.finish(reader_deadline);
        let elapsed = start.elapsed();

        match waited {
            Ok(Some(status)) => {
                tracing::debug!(exit_code = ?status.code(), elapsed_ms = elapsed.as_millis() as u64, "process exited");
                if let Some(fault) = silent_signal_death(&status, &stdout, &stderr) {
                    return ExecutionOutcome::fault(fault).with_elapsed(elapsed);
                }
                ExecutionOutcome::completed(stdout, stderr, status.code()).with_elapsed(elapsed)
            }
            Ok(None) => {
                tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "process timed out and was killed");
                ExecutionOutcome::timed_out(stdout, stderr).with_elapsed(elapsed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed while waiting for test binary");
                ExecutionOutcome::fault(ProcessFault::Exception(e.to_string())).with_elapsed(elapsed)
            }
        }
    }
}

fn spawn(binary: &Path, interactive: bool) -> std::io::Result<Child> {
    let stdin = if interactive { Stdio::piped() } else { Stdio::null() };
    Command::new(binary)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
}

/// Write the scripted input on a helper thread, then close the pipe.
///
/// A child that exits without reading everything closes its end first; the resulting broken pipe is expected.
fn feed_stdin(mut stdin: ChildStdin, payload: String) {
    thread::spawn(move || {
        if let Err(e) = stdin.write_all(payload.as_bytes()).and_then(|()| stdin.flush()) {
            if e.kind() != ErrorKind::BrokenPipe {
                tracing::debug!(error = %e, "failed to write scripted input");
            }
        }
    });
}

/// Wait for the child until `timeout`; on expiry kill and reap it and return `Ok(None)`.
fn wait_bounded(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    match child.wait_timeout(timeout) {
        Ok(Some(status)) => Ok(Some(status)),
        Ok(None) => {
            kill_and_reap(child);
            Ok(None)
        }
        Err(e) => {
            kill_and_reap(child);
            Err(e)
        }
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "kill failed (process may have already exited)");
    }
    let _ = child.wait();
}

/// A child killed by a signal (not by us) before printing anything is an infrastructure fault.
#[cfg(unix)]
fn silent_signal_death(status: &ExitStatus, stdout: &str, stderr: &str) -> Option<ProcessFault> {
    use std::os::unix::process::ExitStatusExt;

    let signal = status.signal()?;
    if stdout.is_empty() && stderr.is_empty() {
        Some(ProcessFault::Exception(format!("process terminated by signal {signal}")))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn silent_signal_death(_status: &ExitStatus, _stdout: &str, _stderr: &str) -> Option<ProcessFault> {
    None
}
