use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::Runtime;

/// Module for one-off tests which do not follow the rest of the
/// test layout.
mod one_offs;

// eval-okay-* tests contain an Amber script, and an expectation of
// the printed representation of the value it evaluates to.
#[rstest]
fn eval_okay(#[files("src/tests/amber_tests/eval-okay-*.amb")] code_path: PathBuf) {
    let code = std::fs::read_to_string(&code_path).expect("should be able to read test code");
    let exp = std::fs::read_to_string(code_path.with_extension("exp"))
        .expect("should be able to read test expectation");

    let runtime = Runtime::new();
    let result = runtime
        .evaluate(&code, Some(code_path.clone()))
        .unwrap_or_else(|err| {
            panic!(
                "{}: evaluation should succeed, but failed: {}",
                code_path.display(),
                err.fancy_format_str(&runtime.source_map()),
            )
        });

    assert_eq!(
        result.to_string(),
        exp.trim(),
        "{}: result value representation (left) must match expectation (right)",
        code_path.display()
    );
}

// eval-fail-* tests contain an Amber script which is expected to
// fail evaluation. The exact kind of failure is asserted in one-off
// tests instead.
#[rstest]
fn eval_fail(#[files("src/tests/amber_tests/eval-fail-*.amb")] code_path: PathBuf) {
    let code = std::fs::read_to_string(&code_path).expect("should be able to read test code");

    let runtime = Runtime::new();
    let result = runtime.evaluate(&code, Some(code_path.clone()));

    assert!(
        result.is_err(),
        "{}: evaluation should fail, but succeeded with {}",
        code_path.display(),
        result.unwrap()
    );
}
