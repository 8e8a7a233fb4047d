//! Reconstructing a live closure from its persisted form.

use std::rc::Rc;

use amber_eval::{Runtime, Value};
use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::persist::{PersistedClosure, PersistedValue};
use crate::wrap::WrappedClosure;

/// Revive a plain captured value.
fn plain_value(persisted: &PersistedValue) -> Result<Value> {
    match persisted {
        PersistedValue::Null => Ok(Value::Null),
        PersistedValue::Bool(b) => Ok(Value::Bool(*b)),
        PersistedValue::Integer(n) => Ok(Value::Integer(*n)),
        PersistedValue::Float(n) => Ok(Value::Float(*n)),
        PersistedValue::String(s) => Ok(Value::String(s.as_str().into())),

        PersistedValue::Closure(_) => Err(Error::InvalidForm {
            reason: "captured closure not listed in the nested set",
        }),
    }
}

impl WrappedClosure {
    /// Rebuild a live, callable closure from its persisted form.
    ///
    /// Nested entries are reconstructed first, bottom-up. All
    /// captured bindings are then injected into a fresh evaluation
    /// scope — one scope per call, shared with nothing — in which
    /// the recovered source is evaluated. The evaluation must
    /// produce a closure; the new wrapper is built by re-running the
    /// whole wrap path against it, making it indistinguishable from
    /// one wrapped directly.
    pub fn from_persisted(runtime: &Rc<Runtime>, form: &PersistedClosure) -> Result<Self> {
        for name in &form.nested {
            if !form.captured.contains_key(name) {
                return Err(Error::InvalidForm {
                    reason: "nested set names a variable absent from the captured mapping",
                });
            }
        }

        let mut bindings = Vec::with_capacity(form.captured.len());
        for (name, value) in &form.captured {
            let value = if form.nested.contains(name) {
                match value {
                    PersistedValue::Closure(inner) => {
                        Self::from_persisted(runtime, inner)?.closure().clone()
                    }
                    _ => {
                        return Err(Error::InvalidForm {
                            reason: "nested set names a variable holding plain data",
                        })
                    }
                }
            } else {
                plain_value(value)?
            };

            bindings.push((SmolStr::new(name), value));
        }

        let produced = runtime
            .evaluate_with(&form.source, None, &bindings)
            .map_err(Error::Evaluation)?;

        if !matches!(produced, Value::Closure(_)) {
            return Err(Error::NotAFunction {
                actual: produced.type_of(),
            });
        }

        Self::wrap(runtime, produced)
    }
}
