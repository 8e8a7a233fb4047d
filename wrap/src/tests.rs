use std::rc::Rc;

use amber_eval::{Closure, ErrorKind, Runtime, Value};
use pretty_assertions::assert_eq;
use smol_str::SmolStr;

use crate::{Captured, Error, PersistedClosure, WrappedClosure};

fn wrap_script(runtime: &Rc<Runtime>, code: &str) -> WrappedClosure {
    let value = runtime.evaluate(code, None).expect("script should evaluate");
    WrappedClosure::wrap(runtime, value).expect("wrapping should succeed")
}

#[test]
fn no_capture_round_trip() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(&runtime, "fn (x) { x + 1 }");

    assert_eq!(wrapper.invoke(vec![Value::Integer(5)]).unwrap(), Value::Integer(6));
    assert!(wrapper.used_variables().is_empty());
    assert!(wrapper.nested_names().is_empty());

    let revived = WrappedClosure::from_persisted(&runtime, &wrapper.persist()).unwrap();
    assert_eq!(revived.invoke(vec![Value::Integer(5)]).unwrap(), Value::Integer(6));
}

#[test]
fn scalar_capture_is_introspectable_and_survives_round_trip() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(&runtime, "let a = 10; fn (x) use (a) { x + a }");

    assert_eq!(wrapper.code(), "fn (x) use (a) { x + a }");
    assert_eq!(wrapper.used_variables().len(), 1);
    assert!(matches!(
        wrapper.used_variables().get("a"),
        Some(Captured::Plain(Value::Integer(10)))
    ));
    assert_eq!(wrapper.invoke(vec![Value::Integer(5)]).unwrap(), Value::Integer(15));

    // reconstruction happens in a different runtime, where no
    // binding for `a` ever existed
    let elsewhere = Rc::new(Runtime::new());
    let revived = WrappedClosure::from_persisted(&elsewhere, &wrapper.persist()).unwrap();
    assert_eq!(revived.invoke(vec![Value::Integer(5)]).unwrap(), Value::Integer(15));
}

#[test]
fn nested_closures_are_wrapped_recursively() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(
        &runtime,
        "let inner = fn (y) { y * 2 };\nlet outer = fn (x) use (inner) { x + inner(x) };\nouter",
    );

    assert!(matches!(
        wrapper.used_variables().get("inner"),
        Some(Captured::Nested(_))
    ));

    let form = wrapper.persist();
    assert_eq!(
        form.nested.iter().collect::<Vec<_>>(),
        vec![&"inner".to_string()]
    );

    let elsewhere = Rc::new(Runtime::new());
    let revived = WrappedClosure::from_persisted(&elsewhere, &form).unwrap();
    assert_eq!(revived.invoke(vec![Value::Integer(3)]).unwrap(), Value::Integer(9));
}

#[test]
fn serialization_is_idempotent() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(
        &runtime,
        "let a = 1;\nlet inner = fn (y) use (a) { y + a };\nfn (x) use (inner, a) { inner(x) * a }",
    );

    let form = wrapper.persist();
    let reserialized = WrappedClosure::from_persisted(&runtime, &form)
        .unwrap()
        .persist();

    assert_eq!(reserialized, form);
}

#[test]
fn wrapper_invariants_hold() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(
        &runtime,
        "let a = 1;\nlet f = fn () { 0 };\nfn (x, y) use (a, f) { x + y + a + f() }",
    );

    // captured keys are exactly the clause names
    let keys: Vec<_> = wrapper.used_variables().keys().cloned().collect();
    assert_eq!(keys, vec![SmolStr::new("a"), SmolStr::new("f")]);

    // nested names are a subset of the captured keys
    for name in wrapper.nested_names() {
        assert!(wrapper.used_variables().contains_key(name));
    }
    assert_eq!(wrapper.nested_names().len(), 1);

    // parameters pass through from the runtime's view of the closure
    assert_eq!(wrapper.parameters(), &[SmolStr::new("x"), SmolStr::new("y")]);
}

#[test]
fn wrapping_plain_data_is_rejected() {
    let runtime = Rc::new(Runtime::new());
    let err = WrappedClosure::wrap(&runtime, Value::Integer(1)).unwrap_err();
    assert!(matches!(err, Error::NotAClosure { actual: "int" }));
}

#[test]
fn wrapping_a_builtin_is_rejected() {
    let runtime = Rc::new(Runtime::new());
    let abs = runtime.evaluate("abs", None).unwrap();

    let err = WrappedClosure::wrap(&runtime, abs).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { what: "abs" }));
}

#[test]
fn capturing_a_builtin_is_rejected() {
    let runtime = Rc::new(Runtime::new());
    let value = runtime
        .evaluate("fn (x) use (abs) { abs(x) }", None)
        .unwrap();

    let err = WrappedClosure::wrap(&runtime, value).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { what: "abs" }));
}

#[test]
fn clause_name_missing_from_live_captures_is_rejected() {
    let runtime = Rc::new(Runtime::new());
    let value = runtime
        .evaluate("let a = 1; fn (x) use (a) { x + a }", None)
        .unwrap();

    // strip the live capture set while keeping the clause, so the
    // static text and the runtime bindings disagree
    let closure = value.to_closure().unwrap();
    let bare = Value::Closure(Rc::new(Closure::new(closure.lambda.clone(), Vec::new())));

    let err = WrappedClosure::wrap(&runtime, bare).unwrap_err();
    assert!(matches!(err, Error::UndefinedCapture { name } if name == "a"));
}

#[test]
fn self_referential_capture_is_detected() {
    let runtime = Rc::new(Runtime::new());
    let value = runtime
        .evaluate("let g = fn () { 0 }; fn () use (g) { g() }", None)
        .unwrap();

    // redirect the captured `g` at the closure itself, forming a
    // cycle that the persisted form could never represent
    let closure = value.to_closure().unwrap().clone();
    closure.captured.borrow_mut()[0].1 = value.clone();

    let err = WrappedClosure::wrap(&runtime, value).unwrap_err();
    assert!(matches!(err, Error::CaptureCycle { name } if name == "g"));
}

#[test]
fn invocation_failures_propagate_unchanged() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(&runtime, "fn (x) { x / 0 }");

    // the failure comes out as the evaluator's own error, not as a
    // wrapping error
    let err = wrapper.invoke(vec![Value::Integer(1)]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DivisionByZero);
}

#[test]
fn reconstructions_use_isolated_scopes() {
    let runtime = Rc::new(Runtime::new());

    let first = wrap_script(&runtime, "let a = 1; fn () use (a) { a }").persist();
    let second = wrap_script(&runtime, "let a = 2; fn () use (a) { a }").persist();

    let first = WrappedClosure::from_persisted(&runtime, &first).unwrap();
    let second = WrappedClosure::from_persisted(&runtime, &second).unwrap();

    assert_eq!(first.invoke(vec![]).unwrap(), Value::Integer(1));
    assert_eq!(second.invoke(vec![]).unwrap(), Value::Integer(2));
}

#[test]
fn reconstructed_wrapper_matches_original_metadata() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(&runtime, "let a = 7; fn (x) use (a) { x % a }");

    let revived = WrappedClosure::from_persisted(&runtime, &wrapper.persist()).unwrap();

    assert_eq!(revived.code(), wrapper.code());
    assert_eq!(revived.parameters(), wrapper.parameters());
    assert_eq!(revived.nested_names(), wrapper.nested_names());
    assert_eq!(
        revived.used_variables().keys().collect::<Vec<_>>(),
        wrapper.used_variables().keys().collect::<Vec<_>>()
    );
}

#[test]
fn reconstruction_rejects_non_function_source() {
    let runtime = Rc::new(Runtime::new());
    let form = PersistedClosure {
        source: "42".into(),
        captured: Default::default(),
        nested: Default::default(),
    };

    let err = WrappedClosure::from_persisted(&runtime, &form).unwrap_err();
    assert!(matches!(err, Error::NotAFunction { actual: "int" }));
}

#[test]
fn reconstruction_reports_evaluation_failures() {
    let runtime = Rc::new(Runtime::new());
    let form = PersistedClosure {
        source: "flurb".into(),
        captured: Default::default(),
        nested: Default::default(),
    };

    let err = WrappedClosure::from_persisted(&runtime, &form).unwrap_err();
    assert!(matches!(err, Error::Evaluation(_)));
}

#[test]
fn reconstruction_validates_the_nested_set() {
    let runtime = Rc::new(Runtime::new());
    let form = PersistedClosure {
        source: "fn () { 0 }".into(),
        captured: Default::default(),
        nested: ["ghost".to_string()].into(),
    };

    let err = WrappedClosure::from_persisted(&runtime, &form).unwrap_err();
    assert!(matches!(err, Error::InvalidForm { .. }));
}

#[test]
fn persisted_form_round_trips_through_json() {
    let runtime = Rc::new(Runtime::new());
    let wrapper = wrap_script(
        &runtime,
        "let greeting = \"hello\";\nlet shout = fn (s) use (greeting) { greeting + \" \" + s };\nshout",
    );

    let json = wrapper.persist().to_json().unwrap();
    let form = PersistedClosure::from_json(&json).unwrap();
    assert_eq!(form, wrapper.persist());

    let revived = WrappedClosure::from_persisted(&runtime, &form).unwrap();
    assert_eq!(
        revived.invoke(vec![Value::String("world".into())]).unwrap(),
        Value::String("hello world".into())
    );
}
