//! Turn an execution outcome and an expectation set into a verdict.
//!
//! ## Notes
//!
//! - Checks short-circuit: the first missing substring decides the message and nothing after it is looked at.
//! - Stdout requirements are checked before stderr requirements.
//! - Exit status is deliberately ignored. The library under test reports failures through printed diagnostics,
//!   so a non-zero exit with the right text still passes.

use std::fmt;

use crate::case::Expectation;
use crate::outcome::ExecutionOutcome;
use crate::result::TestResult;

/// Failure message for a process killed at its deadline.
pub const TIMED_OUT_MSG: &str = "Test timed out";

/// The first required substring that was not found, and in which stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Stdout(String),
    Stderr(String),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Stdout(expected) => write!(f, "Expected '{expected}' not found in stdout"),
            Mismatch::Stderr(expected) => write!(f, "Expected error '{expected}' not found in stderr"),
        }
    }
}

/// Find the first required substring missing from the captured output.
///
/// ## Parameters
/// - `outcome`: captured stdout/stderr.
/// - `expectation`: required substrings; an empty stderr list skips the stderr check.
///
/// ## Returns
/// - `None` if every requirement is satisfied (vacuously true for an empty expectation).
pub fn first_mismatch(outcome: &ExecutionOutcome, expectation: &Expectation) -> Option<Mismatch> {
    if expectation.is_empty() {
        return None;
    }
    if let Some(missing) = missing_from(&outcome.stdout, &expectation.stdout) {
        return Some(Mismatch::Stdout(missing.to_string()));
    }
    missing_from(&outcome.stderr, &expectation.stderr).map(|missing| Mismatch::Stderr(missing.to_string()))
}

fn missing_from<'a>(haystack: &str, required: &'a [String]) -> Option<&'a str> {
    required
        .iter()
        .map(String::as_str)
        .find(|needle| !haystack.contains(needle))
}

/// Produce the verdict for one test.
///
/// ## Notes
/// - Precedence: a process fault wins, then a timeout, then the first expectation mismatch.
/// - A timed-out run fails even if its partial output already satisfied every requirement.
pub fn evaluate(name: &str, outcome: &ExecutionOutcome, expectation: &Expectation) -> TestResult {
    if let Some(fault) = &outcome.process_error {
        return TestResult::fail(name, fault.to_string());
    }
    if outcome.timed_out {
        return TestResult::fail(name, TIMED_OUT_MSG);
    }
    match first_mismatch(outcome, expectation) {
        Some(mismatch) => TestResult::fail(name, mismatch.to_string()),
        None => TestResult::pass(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ProcessFault;

    fn expect(stdout: &[&str], stderr: &[&str]) -> Expectation {
        Expectation {
            stdout: stdout.iter().map(|s| s.to_string()).collect(),
            stderr: stderr.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_all_found_passes() {
        let outcome = ExecutionOutcome::completed("Port: 8080\n", "", Some(0));
        let result = evaluate("test_int_range", &outcome, &expect(&["Port: 8080"], &[]));
        assert!(result.passed());
        assert_eq!(result.message(), "");
    }

    #[test]
    fn test_first_missing_stdout_wins() {
        let outcome = ExecutionOutcome::completed("Starting...\n", "", Some(0));
        let result = evaluate("x", &outcome, &expect(&["Starting...", "Done", "Also missing"], &[]));
        assert!(!result.passed());
        assert_eq!(result.message(), "Expected 'Done' not found in stdout");
    }

    #[test]
    fn test_stderr_checked_after_stdout() {
        let outcome = ExecutionOutcome::completed("Result: failure\n", "something else\n", Some(1));
        let result = evaluate(
            "test_parse_fail",
            &outcome,
            &expect(&["Result: failure"], &["Error: Unknown option '--invalid'"]),
        );
        assert_eq!(
            result.message(),
            "Expected error 'Error: Unknown option '--invalid'' not found in stderr"
        );
    }

    #[test]
    fn test_stdout_mismatch_reported_before_stderr_mismatch() {
        let outcome = ExecutionOutcome::completed("", "", Some(0));
        let mismatch = first_mismatch(&outcome, &expect(&["a"], &["b"]));
        assert_eq!(mismatch, Some(Mismatch::Stdout("a".to_string())));
    }

    #[test]
    fn test_stderr_text_does_not_satisfy_stdout() {
        let outcome = ExecutionOutcome::completed("", "Port: 8080", Some(0));
        let result = evaluate("x", &outcome, &expect(&["Port: 8080"], &[]));
        assert!(!result.passed());
    }

    #[test]
    fn test_matching_is_case_sensitive_and_untrimmed() {
        let outcome = ExecutionOutcome::completed("port: 8080\n", "", Some(0));
        assert!(!evaluate("x", &outcome, &expect(&["Port: 8080"], &[])).passed());

        let outcome = ExecutionOutcome::completed("Port:8080\n", "", Some(0));
        assert!(!evaluate("x", &outcome, &expect(&["Port: 8080"], &[])).passed());
    }

    #[test]
    fn test_empty_expectation_always_passes() {
        let outcome = ExecutionOutcome::completed("anything", "whatever", Some(3));
        assert!(evaluate("x", &outcome, &Expectation::default()).passed());
        assert_eq!(first_mismatch(&ExecutionOutcome::completed("", "", None), &Expectation::default()), None);
    }

    #[test]
    fn test_exit_code_is_ignored() {
        let outcome = ExecutionOutcome::completed("Done\n", "", Some(42));
        assert!(evaluate("x", &outcome, &expect(&["Done"], &[])).passed());
    }

    #[test]
    fn test_timeout_beats_satisfied_output() {
        let outcome = ExecutionOutcome::timed_out("Done\n", "");
        let result = evaluate("x", &outcome, &expect(&["Done"], &[]));
        assert_eq!(result.message(), TIMED_OUT_MSG);
    }

    #[test]
    fn test_fault_beats_everything() {
        let outcome = ExecutionOutcome::not_found("build/tests/missing");
        let result = evaluate("missing", &outcome, &Expectation::default());
        assert!(!result.passed());
        assert_eq!(result.message(), "Executable not found: build/tests/missing");

        let outcome = ExecutionOutcome::fault(ProcessFault::Exception("boom".into()));
        assert_eq!(evaluate("x", &outcome, &Expectation::default()).message(), "Exception: boom");
    }
}
