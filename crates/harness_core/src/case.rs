//! Declarative test case descriptions.

use std::time::Duration;

/// Time a binary may run before the harness kills it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How a test binary receives its standard input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    /// No scripted input; stdin is at EOF from the start.
    #[default]
    Batch,
    /// The lines are written to stdin up front, newline-terminated, then stdin is closed.
    Interactive { input_lines: Vec<String> },
}

impl RunMode {
    /// Short lowercase label (`batch` / `interactive`) for listings and logs.
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Batch => "batch",
            RunMode::Interactive { .. } => "interactive",
        }
    }
}

/// Substrings that must appear in a test's captured output.
///
/// Order of the lists is the order of checking, not a required order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expectation {
    pub stdout: Vec<String>,
    /// Empty means "no stderr check".
    pub stderr: Vec<String>,
}

impl Expectation {
    pub fn stdout<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stdout: required.into_iter().map(Into::into).collect(),
            stderr: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// One test: which binary to run, what to feed it, and what its output must contain.
///
/// Built once before a run and never mutated while the suite executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Binary file name, resolved against the build-output directory. Unique within a suite.
    pub name: String,
    /// Human label used in the progress line (`Running <description> tests...`).
    pub description: Option<String>,
    pub mode: RunMode,
    pub expect: Expectation,
    pub timeout: Duration,
}

impl TestCase {
    /// Create a batch-mode case that only checks stdout.
    pub fn batch<I, S>(name: impl Into<String>, expected_stdout: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            mode: RunMode::Batch,
            expect: Expectation::stdout(expected_stdout),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create an interactive case that feeds `input_lines` on stdin.
    pub fn interactive<I, S, J, T>(name: impl Into<String>, input_lines: I, expected_stdout: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            mode: RunMode::Interactive {
                input_lines: input_lines.into_iter().map(Into::into).collect(),
            },
            expect: Expectation::stdout(expected_stdout),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_expected_stderr<I, S>(mut self, expected_stderr: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expect.stderr = expected_stderr.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Scripted input lines, if the case is interactive.
    pub fn input_lines(&self) -> Option<&[String]> {
        match &self.mode {
            RunMode::Batch => None,
            RunMode::Interactive { input_lines } => Some(input_lines),
        }
    }

    /// Exact bytes written to stdin, or `None` for batch mode.
    ///
    /// ## Notes
    /// - Lines are joined with `\n` and a trailing `\n` is appended, so an empty script still sends one newline.
    pub fn stdin_payload(&self) -> Option<String> {
        self.input_lines().map(stdin_payload)
    }
}

/// Join scripted lines into the stdin payload (`a\nb\n`).
pub fn stdin_payload(lines: &[String]) -> String {
    let mut payload = lines.join("\n");
    payload.push('\n');
    payload
}
