//! This module implements the runtime representation of an Amber
//! builtin.
//!
//! Builtins are directly backed by Rust code operating on Amber
//! values. They are the one kind of callable that has no source
//! text behind it.

use std::fmt::{Debug, Display};

use crate::errors::ErrorKind;

use super::Value;

pub type BuiltinFn = fn(args: Vec<Value>) -> Result<Value, ErrorKind>;

/// A single built-in function, identified by name and with a fixed
/// arity. Builtins expect to be called with a vector of values
/// corresponding to their arguments in order.
#[derive(Clone)]
pub struct Builtin {
    name: &'static str,
    arity: usize,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: &'static str, arity: usize, func: BuiltinFn) -> Self {
        Builtin { name, arity, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, ErrorKind> {
        if args.len() != self.arity {
            return Err(ErrorKind::WrongArgumentCount {
                expected: self.arity,
                actual: args.len(),
            });
        }

        (self.func)(args)
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "builtin[{}]", self.name)
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}
