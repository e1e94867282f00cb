//! Error-handling lints over every tagpush crate. Test code is skipped.

use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};
use std::path::{Path, PathBuf};

fn crates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates directory")
        .to_path_buf()
}

fn assert_clean(analyzer: Analyzer) {
    let result = analyzer.analyze().expect("analyze");

    if result.has_violations_at(Severity::Warning) {
        panic!("{}", result.format_test_report(Severity::Warning));
    }
}

/// A failed docker, git or file operation must reach the caller, never be
/// turned into a default value.
#[test]
fn failures_are_not_swallowed() {
    let dir = crates_dir();
    let analyzer = Analyzer::builder()
        .root(&dir)
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .rule(NoErrorSwallowing::new())
        .build()
        .expect("build analyzer");

    assert_clean(analyzer);
}

/// Push handles and git results are always inspected.
#[test]
fn results_are_not_dropped() {
    let dir = crates_dir();
    let analyzer = Analyzer::builder()
        .root(&dir)
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .rule(NoSilentResultDrop::new())
        .build()
        .expect("build analyzer");

    assert_clean(analyzer);
}
