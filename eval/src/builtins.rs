//! This module implements the builtins available in every Amber
//! scope.
//!
//! Builtins execute Rust code directly and therefore have no source
//! text; wrapping one fails, which is the intended behaviour for
//! natively-implemented callables.

use crate::errors::ErrorKind;
use crate::value::{Builtin, Value};

fn builtin_abs(args: Vec<Value>) -> Result<Value, ErrorKind> {
    match &args[0] {
        Value::Integer(n) => n
            .checked_abs()
            .map(Value::Integer)
            .ok_or(ErrorKind::IntegerOverflow),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        other => Err(ErrorKind::TypeError {
            expected: "int",
            actual: other.type_of(),
        }),
    }
}

/// Numeric minimum/maximum. Mixed int/float arguments compare as
/// floats but return the chosen operand unchanged.
fn pick(args: Vec<Value>, smaller: bool) -> Result<Value, ErrorKind> {
    let a = args[0].as_float()?;
    let b = args[1].as_float()?;

    let first = if smaller { a <= b } else { a >= b };
    Ok(args.into_iter().nth(if first { 0 } else { 1 }).unwrap())
}

fn builtin_min(args: Vec<Value>) -> Result<Value, ErrorKind> {
    pick(args, true)
}

fn builtin_max(args: Vec<Value>) -> Result<Value, ErrorKind> {
    pick(args, false)
}

fn builtin_type_of(args: Vec<Value>) -> Result<Value, ErrorKind> {
    Ok(Value::String(args[0].type_of().into()))
}

fn builtin_to_string(args: Vec<Value>) -> Result<Value, ErrorKind> {
    match &args[0] {
        // already a string; conversion must not add quoting
        Value::String(s) => Ok(Value::String(s.clone())),
        other => Ok(Value::String(other.to_string().into())),
    }
}

/// The set of global builtins installed into every runtime.
pub fn global_builtins() -> Vec<(&'static str, Value)> {
    vec![
        ("abs", Value::Builtin(Builtin::new("abs", 1, builtin_abs))),
        ("min", Value::Builtin(Builtin::new("min", 2, builtin_min))),
        ("max", Value::Builtin(Builtin::new("max", 2, builtin_max))),
        (
            "typeOf",
            Value::Builtin(Builtin::new("typeOf", 1, builtin_type_of)),
        ),
        (
            "toString",
            Value::Builtin(Builtin::new("toString", 1, builtin_to_string)),
        ),
    ]
}
