//! What actually happened when a binary was run.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Harness-level fault that prevented a normal run.
///
/// The `Display` text is the user-facing failure message for the test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessFault {
    #[error("Executable not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Exception: {0}")]
    Exception(String),
}

/// Captured result of one process invocation.
///
/// Created fresh per run and consumed by the matcher right after.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub process_error: Option<ProcessFault>,
    /// Informational only; verdicts never look at it.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl ExecutionOutcome {
    /// Outcome of a process that finished on its own.
    pub fn completed(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            ..Self::default()
        }
    }

    /// Outcome of a run that never started or broke down.
    pub fn fault(fault: ProcessFault) -> Self {
        Self {
            process_error: Some(fault),
            ..Self::default()
        }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::fault(ProcessFault::NotFound(path.into()))
    }

    /// Outcome of a process killed at its deadline, with whatever it printed first.
    pub fn timed_out(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: true,
            ..Self::default()
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages() {
        let missing = ProcessFault::NotFound(PathBuf::from("build/tests/test_int_range"));
        assert_eq!(missing.to_string(), "Executable not found: build/tests/test_int_range");

        let other = ProcessFault::Exception("Permission denied (os error 13)".to_string());
        assert_eq!(other.to_string(), "Exception: Permission denied (os error 13)");
    }

    #[test]
    fn test_timed_out_keeps_partial_output() {
        let outcome = ExecutionOutcome::timed_out("Starting...\n", "");
        assert!(outcome.timed_out);
        assert_eq!(outcome.stdout, "Starting...\n");
        assert!(outcome.process_error.is_none());
    }
}
