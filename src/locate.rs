//! Locate the directory holding the built test binaries.

use std::path::{Path, PathBuf};

/// Candidate build-output directories tried when none are given, relative to the working directory.
pub const DEFAULT_BUILD_DIRS: &[&str] = &["build/tests", "../build/tests"];

/// The directory test binaries are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDir {
    pub path: PathBuf,
    /// `false` when no candidate existed and `path` is only the first candidate.
    pub found: bool,
}

impl BuildDir {
    /// Path of the binary for a test case.
    pub fn binary(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Default candidates as paths.
pub fn default_candidates() -> Vec<PathBuf> {
    DEFAULT_BUILD_DIRS.iter().map(PathBuf::from).collect()
}

/// Pick the first candidate that exists as a directory.
///
/// If none exists, the first candidate (or the first default) is returned with `found = false`; every test
/// then fails with "Executable not found" instead of the harness aborting.
#[tracing::instrument(skip_all, fields(candidates = candidates.len()))]
pub fn resolve_build_dir(candidates: &[PathBuf]) -> BuildDir {
    if let Some(path) = candidates.iter().find(|p| p.is_dir()) {
        tracing::debug!(path = %path.display(), "using build directory");
        return BuildDir {
            path: path.clone(),
            found: true,
        };
    }

    let fallback = candidates
        .first()
        .cloned()
        .unwrap_or_else(|| Path::new(DEFAULT_BUILD_DIRS[0]).to_path_buf());
    tracing::warn!(
        path = %fallback.display(),
        "no build directory found; test binaries will be reported as missing"
    );
    BuildDir {
        path: fallback,
        found: false,
    }
}
