//! The durable representation of a wrapped closure.
//!
//! A persisted closure is a flat structure of exactly three fields:
//! the literal source text, the captured name→value mapping, and the
//! set of names whose captured value is itself a persisted closure.
//! It serializes to JSON through serde and is what gets written to
//! disk or sent over the wire.

use std::collections::{BTreeMap, BTreeSet};

use amber_eval::Value;
use serde::{Deserialize, Serialize};

use crate::wrap::{Captured, WrappedClosure};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedClosure {
    pub source: String,

    #[serde(default)]
    pub captured: BTreeMap<String, PersistedValue>,

    #[serde(default)]
    pub nested: BTreeSet<String>,
}

/// A captured value in persisted form: plain data, or the persisted
/// form of a nested closure. The two are distinguished by the
/// wrapper's `nested` set, not by shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Closure(Box<PersistedClosure>),
}

impl PersistedClosure {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Persist a captured data value.
///
/// Closure values never reach this point: the wrap path has already
/// turned them into nested wrappers, and those are persisted
/// recursively as whole structures.
fn persist_value(value: &Value) -> PersistedValue {
    match value {
        Value::Null => PersistedValue::Null,
        Value::Bool(b) => PersistedValue::Bool(*b),
        Value::Integer(n) => PersistedValue::Integer(*n),
        Value::Float(n) => PersistedValue::Float(*n),
        Value::String(s) => PersistedValue::String(s.to_string()),

        Value::Closure(_) | Value::Builtin(_) => {
            unreachable!("callable captures are wrapped, never stored as plain data")
        }
    }
}

impl WrappedClosure {
    /// Produce the flat, durable form of this wrapper. Serialization
    /// is total: everything that could fail has already failed while
    /// the wrapper was being built.
    pub fn persist(&self) -> PersistedClosure {
        let captured = self
            .used_variables()
            .iter()
            .map(|(name, captured)| {
                let value = match captured {
                    Captured::Plain(value) => persist_value(value),
                    Captured::Nested(wrapper) => {
                        PersistedValue::Closure(Box::new(wrapper.persist()))
                    }
                };

                (name.to_string(), value)
            })
            .collect();

        PersistedClosure {
            source: self.code().to_owned(),
            captured,
            nested: self.nested_names().iter().map(|n| n.to_string()).collect(),
        }
    }
}
