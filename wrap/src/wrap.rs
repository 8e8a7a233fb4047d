//! The wrapped closure itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::rc::Rc;

use amber_eval::{EvalResult, Reflect, Runtime, Value};
use smol_str::SmolStr;

use crate::captures::{captures, WrapTrail};
use crate::error::Result;
use crate::extract::extract;
use crate::locate::locate;

/// A value captured by a wrapped closure: either plain data, or a
/// closure in its own right, wrapped recursively.
#[derive(Clone, Debug)]
pub enum Captured {
    Plain(Value),
    Nested(Box<WrappedClosure>),
}

impl Captured {
    /// The live value behind this capture.
    pub fn value(&self) -> &Value {
        match self {
            Captured::Plain(value) => value,
            Captured::Nested(wrapper) => wrapper.closure(),
        }
    }
}

/// An Amber closure enriched with its own literal source text and an
/// introspectable view of its captured variables.
///
/// A `WrappedClosure` is immutable: invoking it never changes the
/// recovered text or the captured values, and reconstruction builds
/// a new wrapper instead of mutating an old one.
#[derive(Clone)]
pub struct WrappedClosure {
    runtime: Rc<Runtime>,
    underlying: Value,
    code: String,
    parameters: Vec<SmolStr>,
    captured: BTreeMap<SmolStr, Captured>,
    nested: BTreeSet<SmolStr>,
}

impl WrappedClosure {
    /// Wrap a live closure value.
    ///
    /// This locates the literal that produced the value, trims its
    /// source lines down to exactly the literal text, and resolves
    /// the capture clause against the closure's live captures —
    /// recursively wrapping any captured closures.
    pub fn wrap(runtime: &Rc<Runtime>, value: Value) -> Result<Self> {
        Self::wrap_guarded(runtime, value, &mut WrapTrail::default())
    }

    pub(crate) fn wrap_guarded(
        runtime: &Rc<Runtime>,
        value: Value,
        trail: &mut WrapTrail,
    ) -> Result<Self> {
        let location = locate(runtime.as_ref(), &value)?;
        let code = extract(&location)?;
        let (captured, nested) = captures(runtime, &code, &value, trail)?;

        // location() already guaranteed the value is a closure
        let parameters = runtime.parameters(&value).unwrap_or_default();

        Ok(WrappedClosure {
            runtime: runtime.clone(),
            underlying: value,
            code,
            parameters,
            captured,
            nested,
        })
    }

    /// Apply the wrapped closure to the given arguments.
    ///
    /// Arguments are forwarded positionally and the result — or the
    /// failure — of the closure itself is returned unchanged, in the
    /// evaluator's own error type. A failing invocation is the
    /// closure's business, not the wrapper's.
    pub fn invoke(&self, args: Vec<Value>) -> EvalResult<Value> {
        self.runtime.call(&self.underlying, args)
    }

    /// The exact literal text that defines the closure.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The declared parameter names.
    pub fn parameters(&self) -> &[SmolStr] {
        &self.parameters
    }

    /// The captured variables: capture-clause name → value.
    pub fn used_variables(&self) -> &BTreeMap<SmolStr, Captured> {
        &self.captured
    }

    /// The names within [`Self::used_variables`] whose value is a
    /// recursively wrapped closure.
    pub fn nested_names(&self) -> &BTreeSet<SmolStr> {
        &self.nested
    }

    /// The live closure value this wrapper currently wraps.
    pub fn closure(&self) -> &Value {
        &self.underlying
    }
}

impl Debug for WrappedClosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedClosure")
            .field("code", &self.code)
            .field("parameters", &self.parameters)
            .field("captured", &self.captured)
            .field("nested", &self.nested)
            .finish_non_exhaustive()
    }
}
