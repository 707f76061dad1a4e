//! Layering guardrails to keep the data model crate free of process and filesystem plumbing.
//!
//! `harness_core` holds the pure model and matcher. Process spawning belongs to the `runner` module of the root
//! crate; this test fails if the core manifest picks up the process crates or its sources reach for
//! `std::process` / `std::fs`.

const CORE_SOURCES: &[(&str, &str)] = &[
    ("lib.rs", include_str!("../crates/harness_core/src/lib.rs")),
    ("case.rs", include_str!("../crates/harness_core/src/case.rs")),
    ("matcher.rs", include_str!("../crates/harness_core/src/matcher.rs")),
    ("outcome.rs", include_str!("../crates/harness_core/src/outcome.rs")),
    ("result.rs", include_str!("../crates/harness_core/src/result.rs")),
];

#[test]
fn core_does_not_depend_on_process_crates() {
    let manifest = include_str!("../crates/harness_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        for forbidden in ["wait-timeout", "tempfile", "tracing"] {
            if line_no_comment.starts_with(forbidden) {
                panic!("`{forbidden}` must not appear in harness_core [dependencies]");
            }
        }
    }
}

#[test]
fn core_sources_do_no_io() {
    for (file, source) in CORE_SOURCES {
        for forbidden in ["std::process", "std::fs", "std::io"] {
            assert!(
                !source.contains(forbidden),
                "harness_core/src/{file} must not use `{forbidden}`"
            );
        }
    }
}
