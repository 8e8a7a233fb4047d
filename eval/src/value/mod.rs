//! This module implements the backing representation of runtime
//! values in the Amber language.

use std::fmt::Display;
use std::rc::Rc;

use itertools::Itertools;

use crate::errors::ErrorKind;

mod builtin;
mod function;

pub use builtin::{Builtin, BuiltinFn};
pub use function::{Closure, Lambda};

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Closure(Rc<Closure>),
    Builtin(Builtin),
}

impl Value {
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Closure(_) => "function",
            Value::Builtin(_) => "builtin",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Is this value something that can be applied to arguments?
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Builtin(_))
    }

    pub fn as_bool(&self) -> Result<bool, ErrorKind> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ErrorKind::TypeError {
                expected: "bool",
                actual: other.type_of(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i64, ErrorKind> {
        match self {
            Value::Integer(n) => Ok(*n),
            other => Err(ErrorKind::TypeError {
                expected: "int",
                actual: other.type_of(),
            }),
        }
    }

    /// Numeric view of the value, promoting integers to floats.
    pub fn as_float(&self) -> Result<f64, ErrorKind> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Float(n) => Ok(*n),
            other => Err(ErrorKind::TypeError {
                expected: "float",
                actual: other.type_of(),
            }),
        }
    }

    pub fn as_str(&self) -> Result<&str, ErrorKind> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(ErrorKind::TypeError {
                expected: "string",
                actual: other.type_of(),
            }),
        }
    }

    pub fn to_closure(&self) -> Option<&Rc<Closure>> {
        match self {
            Value::Closure(closure) => Some(closure),
            _ => None,
        }
    }
}

/// Emit a string in Amber literal syntax (quoted, with the escapes
/// the lexer understands).
fn escape_string(s: &str, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Integer(num) => write!(f, "{}", num),
            Value::Float(num) => write!(f, "{}", num),
            Value::String(s) => escape_string(s, f),
            Value::Closure(closure) => {
                write!(f, "<fn({})>", closure.lambda.params.iter().join(", "))
            }
            Value::Builtin(builtin) => write!(f, "{}", builtin),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,

            // numeric comparison promotes integers, as `==` does in
            // the language itself
            (Value::Integer(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Integer(b)) => *a == (*b as f64),

            (Value::String(a), Value::String(b)) => a == b,

            // functions are equal only to themselves
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name() == b.name(),

            _ => false,
        }
    }
}
