use pretty_assertions::assert_eq;
use smol_str::SmolStr;

use crate::{ErrorKind, Reflect, Runtime, Value};

#[test]
fn script_without_result_yields_null() {
    let result = Runtime::new().evaluate("let x = 1;", None).unwrap();
    assert_eq!(result, Value::Null);
}

#[test]
fn unknown_variable_is_reported_with_its_name() {
    let err = Runtime::new().evaluate("flurb", None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownVariable(SmolStr::new("flurb")));
}

#[test]
fn injected_bindings_are_visible() {
    let runtime = Runtime::new();
    let result = runtime
        .evaluate_with(
            "x + y",
            None,
            &[
                (SmolStr::new("x"), Value::Integer(1)),
                (SmolStr::new("y"), Value::Integer(2)),
            ],
        )
        .unwrap();

    assert_eq!(result, Value::Integer(3));
}

#[test]
fn injected_bindings_do_not_leak_between_evaluations() {
    let runtime = Runtime::new();
    runtime
        .evaluate_with("x", None, &[(SmolStr::new("x"), Value::Integer(1))])
        .unwrap();

    let err = runtime.evaluate("x", None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownVariable(SmolStr::new("x")));
}

#[test]
fn function_body_does_not_see_enclosing_locals() {
    // without a `use` clause, `a` is invisible inside the body; the
    // error surfaces when the body actually runs
    let err = Runtime::new()
        .evaluate("let a = 1; let f = fn () { a }; f()", None)
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnknownVariable(SmolStr::new("a")));
}

#[test]
fn captures_are_snapshotted_at_definition_time() {
    let result = Runtime::new()
        .evaluate(
            "let a = 1; let f = fn () use (a) { a }; let a = 2; f()",
            None,
        )
        .unwrap();

    assert_eq!(result, Value::Integer(1));
}

#[test]
fn capture_of_unbound_name_fails_at_definition_time() {
    // note: the literal is never called
    let err = Runtime::new()
        .evaluate("let f = fn () use (missing) { 0 }; 1", None)
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnknownVariable(SmolStr::new("missing")));
}

#[test]
fn call_applies_builtins() {
    let runtime = Runtime::new();
    let abs = runtime.evaluate("abs", None).unwrap();

    let result = runtime.call(&abs, vec![Value::Integer(-5)]).unwrap();
    assert_eq!(result, Value::Integer(5));
}

#[test]
fn call_rejects_plain_data() {
    let err = Runtime::new()
        .call(&Value::Integer(1), vec![])
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotCallable("int"));
}

#[test]
fn call_checks_arity() {
    let runtime = Runtime::new();
    let f = runtime.evaluate("fn (x, y) { x + y }", None).unwrap();

    let err = runtime.call(&f, vec![Value::Integer(1)]).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::WrongArgumentCount {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn closure_reflection_reports_definition_site() {
    let runtime = Runtime::new();
    let f = runtime
        .evaluate("let unused = 0;\nfn (x, y) use () { x }", None)
        .unwrap();

    let location = runtime.location(&f).expect("closure should have a location");
    assert_eq!(location.path(), "<eval>");
    assert_eq!(location.start_line, 2);
    assert_eq!(location.end_line, 2);

    let params = runtime.parameters(&f).unwrap();
    assert_eq!(params, vec![SmolStr::new("x"), SmolStr::new("y")]);
    assert!(runtime.captured(&f).unwrap().is_empty());
}

#[test]
fn builtins_have_no_reflectable_source() {
    let runtime = Runtime::new();
    let abs = runtime.evaluate("abs", None).unwrap();

    assert!(runtime.location(&abs).is_none());
    assert!(runtime.parameters(&abs).is_none());
    assert!(runtime.captured(&abs).is_none());
}

#[test]
fn captured_closures_are_reflectable() {
    let runtime = Runtime::new();
    let outer = runtime
        .evaluate(
            "let inner = fn (y) { y * 2 }; fn (x) use (inner) { inner(x) }",
            None,
        )
        .unwrap();

    let captured = runtime.captured(&outer).unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].0, SmolStr::new("inner"));
    assert!(matches!(captured[0].1, Value::Closure(_)));
}

#[test]
fn error_formatting_includes_file_and_line() {
    let runtime = Runtime::new();
    let err = runtime
        .evaluate("let x = 1;\nx + flurb", Some("demo.amb".into()))
        .unwrap_err();

    assert_eq!(
        err.fancy_format_str(&runtime.source_map()),
        "error: variable 'flurb' is not bound in this scope at demo.amb:2"
    );
}
