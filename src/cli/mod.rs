//! CLI module for the cmdline acceptance harness
//!
//! ## Usage
//!
//! - `cmdline-harness` - run the built-in `cmdline` library suite against `build/tests`
//! - `cmdline-harness --catalog suite.json --build-dir out/tests` - run a custom catalog
//! - `cmdline-harness --list` - list the selected cases without running them
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use crate::version::HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Report format for suite results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Line-oriented human report
    #[default]
    Console,
    /// One JSON document on stdout
    Json,
}

/// Acceptance test harness for the cmdline argument-parsing library
#[derive(Parser, Debug)]
#[command(name = "cmdline-harness")]
#[command(version = HARNESS_VERSION)]
#[command(about = "Run test binaries and check their output for expected text", long_about = None)]
pub struct Cli {
    /// Test catalog (JSON); the built-in cmdline suite is used when omitted
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Directory holding the test binaries; repeat to give fallbacks (first existing wins)
    #[arg(long = "build-dir", value_name = "DIR")]
    pub build_dirs: Vec<PathBuf>,

    /// Only run tests whose name contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// Show captured output of failing tests
    #[arg(short, long)]
    pub verbose: bool,

    /// List the selected tests and exit without running them
    #[arg(long)]
    pub list: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command line and return the exit code.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let suite = commands::load_suite(cli.catalog.as_deref())?.filtered(cli.filter.as_deref());

    if cli.list {
        return commands::list_cases(&suite);
    }

    commands::run_cases(&suite, &cli.build_dirs, cli.format, cli.verbose)
}

// ============================================================================
// Tests
// ============================================================================
