//! Extraction of the capture clause and the live values behind it.
//!
//! The clause is parsed out of the literal text statically; the
//! values come from the closure's runtime capture set. Both sides
//! must agree: a clause name with no live binding is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use amber_eval::{Closure, Reflect, Runtime, Value};
use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::wrap::{Captured, WrappedClosure};

/// Tracks the closures on the active wrap path, so that a capture
/// graph that loops back on itself is reported instead of recursed
/// into forever.
#[derive(Default)]
pub(crate) struct WrapTrail {
    active: Vec<*const Closure>,
}

impl WrapTrail {
    pub(crate) fn enter(&mut self, closure: &Rc<Closure>, name: &SmolStr) -> Result<()> {
        let ptr = Rc::as_ptr(closure);
        if self.active.contains(&ptr) {
            return Err(Error::CaptureCycle { name: name.clone() });
        }

        self.active.push(ptr);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.active.pop();
    }
}

/// Parse the names of the capture clause out of the literal text.
///
/// The clause sits between the parameter list and the body:
/// `fn (params) use (a, b) { ... }`. If the `use` marker is absent
/// the literal captures nothing.
pub(crate) fn capture_clause(code: &str) -> Result<Vec<SmolStr>> {
    // step over the parameter list first, so that identifiers inside
    // the body can never be mistaken for the marker
    let params_open = code.find('(').ok_or(Error::MalformedCaptureClause)?;
    let params_close = code[params_open..]
        .find(')')
        .map(|idx| params_open + idx)
        .ok_or(Error::MalformedCaptureClause)?;

    let rest = code[params_close + 1..].trim_start();
    let after_marker = match rest.strip_prefix("use") {
        // the marker must be the whole word, not an identifier prefix
        Some(after) if !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') => after,
        _ => return Ok(Vec::new()),
    };

    let clause = after_marker.trim_start();
    if !clause.starts_with('(') {
        return Err(Error::MalformedCaptureClause);
    }

    let close = clause.find(')').ok_or(Error::MalformedCaptureClause)?;
    let names = clause[1..close]
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(SmolStr::new)
        .collect();

    Ok(names)
}

/// Resolve the capture clause of `code` against the live captured
/// values of `value`, recursively wrapping captured closures.
pub(crate) fn captures(
    runtime: &Rc<Runtime>,
    code: &str,
    value: &Value,
    trail: &mut WrapTrail,
) -> Result<(BTreeMap<SmolStr, Captured>, BTreeSet<SmolStr>)> {
    let mut captured = BTreeMap::new();
    let mut nested = BTreeSet::new();

    let names = capture_clause(code)?;
    if names.is_empty() {
        return Ok((captured, nested));
    }

    let live = runtime.captured(value).unwrap_or_default();

    for name in names {
        let bound = live
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| Error::UndefinedCapture { name: name.clone() })?;

        // Captured callables get wrapped recursively so that they
        // survive serialization; anything without source (builtins)
        // fails inside the recursive wrap. Plain data is stored
        // as-is.
        if let Some(closure) = bound.to_closure() {
            trail.enter(closure, &name)?;
            let wrapped = WrappedClosure::wrap_guarded(runtime, bound.clone(), trail);
            trail.leave();

            captured.insert(name.clone(), Captured::Nested(Box::new(wrapped?)));
            nested.insert(name);
        } else if bound.is_callable() {
            return Err(Error::SourceUnavailable {
                what: match &bound {
                    Value::Builtin(builtin) => builtin.name(),
                    _ => bound.type_of(),
                },
            });
        } else {
            captured.insert(name, Captured::Plain(bound));
        }
    }

    Ok((captured, nested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_names_are_parsed_in_order() {
        let names = capture_clause("fn (x) use (a, b , c) { x }").unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_marker_means_no_captures() {
        assert!(capture_clause("fn (x) { x + use_it(x) }").unwrap().is_empty());
    }

    #[test]
    fn empty_clause_means_no_captures() {
        assert!(capture_clause("fn (x) use () { x }").unwrap().is_empty());
    }

    #[test]
    fn marker_without_list_is_rejected() {
        assert!(matches!(
            capture_clause("fn (x) use { x }"),
            Err(Error::MalformedCaptureClause)
        ));
    }
}
