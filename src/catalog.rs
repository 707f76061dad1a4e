//! Test catalog: the suite's test cases as an external JSON data table.
//!
//! Adding a test case is a data change only. A catalog looks like:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "title": "cmdline Library Test Suite",
//!   "tests": [
//!     { "name": "test_int_range", "description": "int range validation", "expected_stdout": ["Port: 8080"] },
//!     { "name": "repl", "input_lines": ["help", "exit"], "expected_stdout": ["> exit"], "timeout_seconds": 2 }
//!   ]
//! }
//! ```
//!
//! ## Notes
//!
//! - `mode` may be omitted: `input_lines` present means interactive, absent means batch.
//! - `mode: "interactive"` without `input_lines` sends a single newline.
//! - Errors carry the catalog text and a labelled span so the CLI can render them with miette.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use harness_core::{DEFAULT_TIMEOUT, Expectation, RunMode, TestCase};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

use crate::suite::Suite;

/// Catalog format version understood by this harness.
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// The `cmdline` library acceptance suite, embedded at compile time.
const BUILTIN_CATALOG: &str = include_str!("../catalog/cmdline_suite.json");
const BUILTIN_CATALOG_NAME: &str = "<builtin>/cmdline_suite.json";

/// Errors raised while loading a catalog.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read catalog {}", .path.display())]
    #[diagnostic(code(harness::catalog::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {message}")]
    #[diagnostic(
        code(harness::catalog::syntax),
        help("a catalog is a JSON object with `schema_version`, `title` and a `tests` array")
    )]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unsupported catalog schema_version {found}; expected {expected}")]
    #[diagnostic(code(harness::catalog::schema))]
    UnsupportedSchema { found: u32, expected: u32 },

    #[error("test #{index} ('{name}'): {reason}")]
    #[diagnostic(code(harness::catalog::invalid_case))]
    InvalidCase { index: usize, name: String, reason: String },

    #[error("duplicate test name '{name}'")]
    #[diagnostic(code(harness::catalog::duplicate), help("test names are binary names and must be unique"))]
    DuplicateName { name: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    schema_version: u32,
    title: String,
    #[serde(default)]
    default_timeout_seconds: Option<f64>,
    tests: Vec<CaseRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseRecord {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mode: Option<ModeRecord>,
    #[serde(default)]
    expected_stdout: Vec<String>,
    #[serde(default)]
    expected_stderr: Vec<String>,
    #[serde(default)]
    input_lines: Option<Vec<String>>,
    #[serde(default)]
    timeout_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ModeRecord {
    Batch,
    Interactive,
}

/// Load the embedded `cmdline` library suite.
pub fn builtin_catalog() -> Result<Suite, CatalogError> {
    parse_catalog(BUILTIN_CATALOG, BUILTIN_CATALOG_NAME)
}

/// Read and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<Suite, CatalogError> {
    let source = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&source, &path.display().to_string())
}

/// Parse and validate catalog text.
///
/// ## Parameters
/// - `source`: JSON text.
/// - `origin`: name shown in diagnostics (usually the file path).
///
/// ## Returns
/// - The suite, with cases in catalog order.
pub fn parse_catalog(source: &str, origin: &str) -> Result<Suite, CatalogError> {
    let file: CatalogFile = serde_json::from_str(source).map_err(|e| CatalogError::Syntax {
        message: e.to_string(),
        span: error_span(source, e.line(), e.column()),
        src: NamedSource::new(origin, source.to_string()),
    })?;

    if file.schema_version != CATALOG_SCHEMA_VERSION {
        return Err(CatalogError::UnsupportedSchema {
            found: file.schema_version,
            expected: CATALOG_SCHEMA_VERSION,
        });
    }

    let default_timeout = match file.default_timeout_seconds {
        None => DEFAULT_TIMEOUT,
        Some(secs) => positive_duration(secs).ok_or_else(|| CatalogError::InvalidCase {
            index: 0,
            name: "<defaults>".to_string(),
            reason: format!("default_timeout_seconds must be a positive number, got {secs}"),
        })?,
    };

    let mut seen = HashSet::new();
    let mut cases = Vec::with_capacity(file.tests.len());
    for (position, record) in file.tests.into_iter().enumerate() {
        let case = record.into_case(position + 1, default_timeout)?;
        if !seen.insert(case.name.clone()) {
            return Err(CatalogError::DuplicateName { name: case.name });
        }
        cases.push(case);
    }

    Ok(Suite::new(file.title, cases))
}

impl CaseRecord {
    fn into_case(self, index: usize, default_timeout: Duration) -> Result<TestCase, CatalogError> {
        let invalid = |name: &str, reason: String| CatalogError::InvalidCase {
            index,
            name: name.to_string(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid(&self.name, "name must not be empty".to_string()));
        }

        let mode = match (self.mode, self.input_lines) {
            (Some(ModeRecord::Batch), Some(_)) => {
                return Err(invalid(&self.name, "batch tests cannot have input_lines".to_string()));
            }
            (Some(ModeRecord::Batch), None) | (None, None) => RunMode::Batch,
            (Some(ModeRecord::Interactive), lines) | (None, lines @ Some(_)) => RunMode::Interactive {
                input_lines: lines.unwrap_or_default(),
            },
        };

        let timeout = match self.timeout_seconds {
            None => default_timeout,
            Some(secs) => positive_duration(secs).ok_or_else(|| {
                invalid(&self.name, format!("timeout_seconds must be a positive number, got {secs}"))
            })?,
        };

        Ok(TestCase {
            name: self.name,
            description: self.description,
            mode,
            expect: Expectation {
                stdout: self.expected_stdout,
                stderr: self.expected_stderr,
            },
            timeout,
        })
    }
}

fn positive_duration(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok().filter(|d| !d.is_zero())
    } else {
        None
    }
}

/// Convert serde_json's 1-based line/column into a byte span.
fn error_span(source: &str, line: usize, column: usize) -> SourceSpan {
    if line == 0 {
        return (0, 0).into();
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(source.len());
    let len = usize::from(offset < source.len());
    (offset, len).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Suite, CatalogError> {
        parse_catalog(source, "test.json")
    }

    #[test]
    fn test_builtin_catalog_has_nine_batch_cases() {
        let suite = builtin_catalog().unwrap();
        assert_eq!(suite.title, "cmdline Library Test Suite");
        assert_eq!(suite.cases.len(), 9);
        assert!(suite.cases.iter().all(|c| c.mode == RunMode::Batch));
        assert_eq!(suite.cases[0].name, "test_parse_fail");
        assert_eq!(suite.cases[0].expect.stderr, vec!["Error: Unknown option '--invalid'"]);
        assert_eq!(suite.cases[8].name, "test_comprehensive_coverage");
    }

    #[test]
    fn test_interactive_catalog_parses() {
        let source = include_str!("../catalog/interactive_cli.json");
        let suite = parse(source).unwrap();
        assert_eq!(suite.cases.len(), 1);
        assert!(suite.cases[0].input_lines().is_some());
    }

    #[test]
    fn test_mode_inference() {
        let suite = parse(
            r#"{
                "schema_version": 1,
                "title": "t",
                "tests": [
                    { "name": "a" },
                    { "name": "b", "input_lines": ["help", "exit"] },
                    { "name": "c", "mode": "interactive" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(suite.cases[0].mode, RunMode::Batch);
        assert_eq!(suite.cases[1].stdin_payload().as_deref(), Some("help\nexit\n"));
        assert_eq!(suite.cases[2].stdin_payload().as_deref(), Some("\n"));
    }

    #[test]
    fn test_timeouts() {
        let suite = parse(
            r#"{
                "schema_version": 1,
                "title": "t",
                "default_timeout_seconds": 2,
                "tests": [ { "name": "a" }, { "name": "b", "timeout_seconds": 0.5 } ]
            }"#,
        )
        .unwrap();
        assert_eq!(suite.cases[0].timeout, Duration::from_secs(2));
        assert_eq!(suite.cases[1].timeout, Duration::from_millis(500));

        let suite = parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a" } ] }"#).unwrap();
        assert_eq!(suite.cases[0].timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_rejects_non_positive_timeout() {
        let err = parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a", "timeout_seconds": 0 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCase { index: 1, .. }));
    }

    #[test]
    fn test_rejects_timeout_that_rounds_to_zero() {
        let err = parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a", "timeout_seconds": 1e-12 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCase { index: 1, .. }));

        let err = parse(r#"{ "schema_version": 1, "title": "t", "default_timeout_seconds": 1e-12, "tests": [] }"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCase { index: 0, .. }));

        let suite =
            parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a", "timeout_seconds": 0.001 } ] }"#)
                .unwrap();
        assert_eq!(suite.cases[0].timeout, Duration::from_millis(1));
    }

    #[test]
    fn test_rejects_batch_with_input() {
        let err = parse(
            r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a", "mode": "batch", "input_lines": ["x"] } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("batch tests cannot have input_lines"));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_names() {
        let err = parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a" }, { "name": "a" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName { ref name } if name == "a"));

        let err = parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": " " } ] }"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCase { .. }));
    }

    #[test]
    fn test_rejects_unknown_schema_and_fields() {
        let err = parse(r#"{ "schema_version": 2, "title": "t", "tests": [] }"#).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedSchema { found: 2, expected: 1 }));

        let err = parse(r#"{ "schema_version": 1, "title": "t", "tests": [ { "name": "a", "stdout": [] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Syntax { .. }));
    }

    #[test]
    fn test_syntax_error_span_points_into_source() {
        let source = "{\n  \"schema_version\": 1,\n  \"title\": oops\n}";
        let err = parse(source).unwrap_err();
        match err {
            CatalogError::Syntax { span, .. } => {
                let line_start = source[..span.offset()].rfind('\n').map_or(0, |i| i + 1);
                let line = source[line_start..].lines().next().unwrap();
                assert_eq!(line, "  \"title\": oops");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Path::new("no/such/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
