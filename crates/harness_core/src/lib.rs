//! Provide the data model and the expectation matcher for the cmdline acceptance harness.
//!
//! This crate is intentionally small and dependency-light. It describes *what* a test is, *what* running it
//! produced, and *what* the verdict is; it never runs anything itself.
//!
//! ## Notes
//!
//! - **No IO**: no process spawning, no filesystem access, no global state. Process plumbing lives in the
//!   `cmdline-harness` crate, which feeds [`ExecutionOutcome`] values into [`matcher::evaluate`].
//! - Matching is purely textual: exact, case-sensitive substring containment.

pub mod case;
pub mod matcher;
pub mod outcome;
pub mod result;

pub use case::{DEFAULT_TIMEOUT, Expectation, RunMode, TestCase};
pub use matcher::{Mismatch, evaluate, first_mismatch};
pub use outcome::{ExecutionOutcome, ProcessFault};
pub use result::{SuiteReport, TestResult};
