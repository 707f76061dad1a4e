#![forbid(unsafe_code)]
//! Black-box acceptance harness for the `cmdline` argument-parsing library.
//!
//! The harness runs prebuilt test binaries, optionally feeding them a scripted sequence of input lines,
//! and checks that required substrings appear in their stdout (and optionally stderr). Results are printed
//! as a report and folded into a CI-friendly exit code.
//!
//! ## Layout
//!
//! - [`catalog`]: test cases as an external JSON data table
//! - [`locate`]: resolve the build-output directory
//! - [`runner`]: run one binary under a timeout and capture its output
//! - [`suite`]: run a whole catalog sequentially and report
//! - [`cli`]: command-line surface
//!
//! The data model and the expectation matcher live in the I/O-free `harness_core` crate and are re-exported.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod catalog;
pub mod cli;
pub mod locate;
pub mod runner;
pub mod suite;
pub mod version;

pub use harness_core::{
    DEFAULT_TIMEOUT, ExecutionOutcome, Expectation, Mismatch, ProcessFault, RunMode, SuiteReport, TestCase,
    TestResult, evaluate, first_mismatch,
};

pub use catalog::{CatalogError, builtin_catalog, load_catalog, parse_catalog};
pub use locate::{BuildDir, resolve_build_dir};
pub use runner::{ProcessRunner, SystemRunner};
pub use suite::{ConsoleReporter, JsonReporter, Suite, SuiteReporter, run_suite};
