//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{self, CatalogError};
use crate::locate::{default_candidates, resolve_build_dir};
use crate::runner::SystemRunner;
use crate::suite::{self, ConsoleReporter, JsonReporter, Suite, SuiteReporter};

use super::{CliError, CliResult, ExitCode, ReportFormat};

/// Load the catalog file, or the built-in suite when no path is given.
pub fn load_suite(path: Option<&Path>) -> CliResult<Suite> {
    let loaded = match path {
        Some(path) => catalog::load_catalog(path),
        None => catalog::builtin_catalog(),
    };
    loaded.map_err(render_catalog_error)
}

/// Render a catalog error as a miette report (source snippet + label where available).
fn render_catalog_error(err: CatalogError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

/// Print `<name>\t<mode>` for each case.
pub fn list_cases(suite: &Suite) -> CliResult<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for case in &suite.cases {
        writeln!(out, "{}\t{}", case.name, case.mode.label()).map_err(write_failed)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the suite and map the report onto the process exit code.
pub fn run_cases(suite: &Suite, build_dirs: &[PathBuf], format: ReportFormat, verbose: bool) -> CliResult<ExitCode> {
    let candidates = if build_dirs.is_empty() {
        default_candidates()
    } else {
        build_dirs.to_vec()
    };
    let bin_dir = resolve_build_dir(&candidates);
    let runner = SystemRunner::new();

    let stdout = io::stdout();
    let out = stdout.lock();
    let mut reporter: Box<dyn SuiteReporter> = match format {
        ReportFormat::Console => Box::new(ConsoleReporter::new(out).verbose(verbose)),
        ReportFormat::Json => Box::new(JsonReporter::new(out)),
    };

    let report = suite::run_suite(suite, &bin_dir, &runner, reporter.as_mut()).map_err(write_failed)?;

    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed; nothing more to say on stderr
        Err(CliError::new("", ExitCode(report.exit_code())))
    }
}

fn write_failed(e: io::Error) -> CliError {
    CliError::failure(format!("Error writing report: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_suite() {
        let suite = load_suite(None).unwrap();
        assert_eq!(suite.cases.len(), 9);
    }

    #[test]
    fn test_load_missing_catalog_is_cli_failure() {
        let err = load_suite(Some(Path::new("no/such/catalog.json"))).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("failed to read catalog"));
    }
}
