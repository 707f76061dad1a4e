//! Suite reporters.
//!
//! [`ConsoleReporter`] prints the line-oriented human report CI logs show; [`JsonReporter`] emits one JSON
//! document for tooling. Implement [`SuiteReporter`] for other formats.

use std::io::{self, Write};

use harness_core::{ExecutionOutcome, SuiteReport, TestCase, TestResult};
use serde::Serialize;

use super::Suite;

const BANNER_WIDTH: usize = 60;

/// Receives suite progress in execution order.
pub trait SuiteReporter {
    fn on_suite_start(&mut self, suite: &Suite) -> io::Result<()>;

    fn on_case_start(&mut self, _case: &TestCase) -> io::Result<()> {
        Ok(())
    }

    fn on_case_complete(
        &mut self,
        _case: &TestCase,
        _outcome: &ExecutionOutcome,
        _result: &TestResult,
    ) -> io::Result<()> {
        Ok(())
    }

    fn on_suite_complete(&mut self, suite: &Suite, report: &SuiteReport) -> io::Result<()>;
}

/// Human-readable report:
///
/// ```text
/// ============================================================
/// cmdline Library Test Suite
/// ============================================================
///
/// Running int range validation tests...
///
/// ============================================================
/// Test Results
/// ============================================================
/// ✓ PASS: test_int_range
///
/// Total: 1/1 tests passed
/// ```
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, verbose: false }
    }

    /// Also dump captured output, exit code and timing for failing cases.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn banner(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{rule}")
    }

    fn dump_outcome(&mut self, outcome: &ExecutionOutcome) -> io::Result<()> {
        let exit = outcome
            .exit_code
            .map_or_else(|| "none".to_string(), |code| code.to_string());
        writeln!(
            self.out,
            "  exit code: {exit}, elapsed: {}ms, timed out: {}",
            outcome.elapsed.as_millis(),
            outcome.timed_out
        )?;
        for (label, text) in [("stdout", &outcome.stdout), ("stderr", &outcome.stderr)] {
            writeln!(self.out, "  --- {label} ---")?;
            for line in text.lines() {
                writeln!(self.out, "  | {line}")?;
            }
        }
        Ok(())
    }
}

impl<W: Write> SuiteReporter for ConsoleReporter<W> {
    fn on_suite_start(&mut self, suite: &Suite) -> io::Result<()> {
        self.banner(&suite.title)?;
        writeln!(self.out)
    }

    fn on_case_start(&mut self, case: &TestCase) -> io::Result<()> {
        match &case.description {
            Some(description) => writeln!(self.out, "Running {description} tests...")?,
            None => writeln!(self.out, "Running {}...", case.name)?,
        }
        self.out.flush()
    }

    fn on_case_complete(&mut self, _case: &TestCase, outcome: &ExecutionOutcome, result: &TestResult) -> io::Result<()> {
        if self.verbose && !result.passed() {
            self.dump_outcome(outcome)?;
        }
        Ok(())
    }

    fn on_suite_complete(&mut self, _suite: &Suite, report: &SuiteReport) -> io::Result<()> {
        writeln!(self.out)?;
        self.banner("Test Results")?;
        for result in report.results() {
            writeln!(self.out, "{result}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", report.summary_line())?;
        self.out.flush()
    }
}

#[derive(Debug, Serialize)]
struct JsonCase {
    #[serde(flatten)]
    result: TestResult,
    mode: &'static str,
    timed_out: bool,
    exit_code: Option<i32>,
    elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    passed: usize,
    failed: usize,
    total: usize,
    exit_code: i32,
    results: &'a [JsonCase],
}

/// Machine-readable report, written once when the suite completes.
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    out: W,
    cases: Vec<JsonCase>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, cases: Vec::new() }
    }
}

impl<W: Write> SuiteReporter for JsonReporter<W> {
    fn on_suite_start(&mut self, _suite: &Suite) -> io::Result<()> {
        self.cases.clear();
        Ok(())
    }

    fn on_case_complete(&mut self, case: &TestCase, outcome: &ExecutionOutcome, result: &TestResult) -> io::Result<()> {
        self.cases.push(JsonCase {
            result: result.clone(),
            mode: case.mode.label(),
            timed_out: outcome.timed_out,
            exit_code: outcome.exit_code,
            elapsed_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
        });
        Ok(())
    }

    fn on_suite_complete(&mut self, suite: &Suite, report: &SuiteReport) -> io::Result<()> {
        let document = JsonDocument {
            title: &suite.title,
            passed: report.passed_count(),
            failed: report.failed_count(),
            total: report.total_count(),
            exit_code: report.exit_code(),
            results: &self.cases,
        };
        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
