//! Suite orchestrator: run every case in catalog order and aggregate the verdicts.
//!
//! ## Reporting
//!
//! Output goes through the [`SuiteReporter`] trait so the console report and the JSON report share one
//! execution loop. See `reporter.rs`.
//!
//! ## Guarantees
//!
//! - Strictly sequential: one child process at a time, torn down before the next case starts.
//! - No fail-fast: a crashed, hung or missing binary only produces a failing result for its own case.
//! - The only error that escapes is a reporter write failure.

pub mod reporter;

use std::io;

use harness_core::{SuiteReport, TestCase, matcher};

use crate::locate::BuildDir;
use crate::runner::ProcessRunner;

pub use reporter::{ConsoleReporter, JsonReporter, SuiteReporter};

/// An ordered set of test cases with a title for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub title: String,
    pub cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(title: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            title: title.into(),
            cases,
        }
    }

    /// Keep only cases whose name contains `keyword`, preserving order.
    pub fn filtered(mut self, keyword: Option<&str>) -> Self {
        if let Some(keyword) = keyword {
            self.cases.retain(|case| case.name.contains(keyword));
        }
        self
    }
}

/// Run every case in `suite` and return the aggregate report.
///
/// ## Parameters
/// - `bin_dir`: directory case names are resolved against.
/// - `runner`: executes one binary (a real [`SystemRunner`](crate::runner::SystemRunner) in production).
/// - `reporter`: receives progress and results as they happen.
///
/// ## Errors
/// - Only I/O errors from the reporter; test failures are data in the report.
#[tracing::instrument(skip_all, fields(title = %suite.title, cases = suite.cases.len()))]
pub fn run_suite(
    suite: &Suite,
    bin_dir: &BuildDir,
    runner: &dyn ProcessRunner,
    reporter: &mut dyn SuiteReporter,
) -> io::Result<SuiteReport> {
    reporter.on_suite_start(suite)?;

    let mut report = SuiteReport::new();
    for case in &suite.cases {
        reporter.on_case_start(case)?;

        let binary = bin_dir.binary(&case.name);
        let outcome = runner.run(&binary, case.input_lines(), case.timeout);
        let result = matcher::evaluate(&case.name, &outcome, &case.expect);

        if result.passed() {
            tracing::debug!(case = %case.name, "passed");
        } else {
            tracing::info!(case = %case.name, reason = %result.message(), "failed");
        }

        reporter.on_case_complete(case, &outcome, &result)?;
        report.push(result);
    }

    reporter.on_suite_complete(suite, &report)?;
    Ok(report)
}
