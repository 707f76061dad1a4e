//! Shell-script fixtures standing in for compiled test binaries.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Hold while writing scripts and running them.
///
/// A script written while another test thread forks can still be open in that child at exec time, which makes
/// the exec fail with ETXTBSY.
pub fn spawn_guard() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    set_mode(&path, 0o755);
    path
}

pub fn set_mode(path: &Path, mode: u32) {
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(mode);
    fs::set_permissions(path, perms).unwrap();
}

/// Prints `Port: 8080` and exits 0.
pub const PORT_SCRIPT: &str = "printf 'Port: 8080\\n'";
/// Prints `Starting...` and nothing else.
pub const STARTING_SCRIPT: &str = "printf 'Starting...\\n'";
/// Echoes each stdin line prefixed with `> `.
pub const ECHO_SCRIPT: &str = "while IFS= read -r line; do printf '> %s\\n' \"$line\"; done";
/// Prints, then outlives any reasonable timeout.
pub const SLEEPER_SCRIPT: &str = "printf 'Starting...\\n'\nsleep 10";
