//! Per-test verdicts and the aggregate suite report.

use std::fmt;

use serde::Serialize;

/// Message used when a failure is recorded without a reason.
const GENERIC_FAILURE_MSG: &str = "Test failed";

/// Verdict for one test case.
///
/// Fields are private so the invariant "a failed result always carries a message" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    name: String,
    passed: bool,
    message: String,
}

impl TestResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: String::new(),
        }
    }

    /// Record a failure. An empty `message` is replaced by a generic one.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = GENERIC_FAILURE_MSG.to_string();
        }
        Self {
            name: name.into(),
            passed: false,
            message,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Empty on pass; the first failure reason otherwise.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "✓ PASS: {}", self.name)
        } else {
            write!(f, "✗ FAIL: {} - {}", self.name, self.message)
        }
    }
}

/// Ordered results of one suite run. Counts and exit code are derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    results: Vec<TestResult>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total_count()
    }

    /// Process exit code for CI: `0` when everything passed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() { 0 } else { 1 }
    }

    /// `Total: X/Y tests passed`
    pub fn summary_line(&self) -> String {
        format!("Total: {}/{} tests passed", self.passed_count(), self.total_count())
    }
}

impl FromIterator<TestResult> for SuiteReport {
    fn from_iter<I: IntoIterator<Item = TestResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
