//! This module implements the runtime representation of functions.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use codemap::Span;
use smol_str::SmolStr;

use crate::syntax::ast;
use crate::value::Value;

/// A function literal as understood by the parser: its parameter
/// names, the names of its capture clause, its body, and the span of
/// the literal text (from the `fn` keyword to the closing brace).
#[derive(Debug)]
pub struct Lambda {
    pub params: Vec<SmolStr>,
    pub captures: Vec<SmolStr>,
    pub(crate) body: ast::Expr,
    pub span: Span,
}

/// A closure: a lambda paired with the values its capture clause
/// snapshotted from the defining scope, in clause order.
///
/// The captured values sit behind a `RefCell` because they are
/// resolved against the defining scope only once the surrounding
/// literal has been fully evaluated.
#[derive(Debug)]
pub struct Closure {
    pub lambda: Rc<Lambda>,
    pub captured: RefCell<Vec<(SmolStr, Value)>>,
}

impl Closure {
    pub fn new(lambda: Rc<Lambda>, captured: Vec<(SmolStr, Value)>) -> Self {
        Closure {
            lambda,
            captured: RefCell::new(captured),
        }
    }

    /// Read-only view of the captured variables.
    pub fn captured(&self) -> Ref<'_, [(SmolStr, Value)]> {
        Ref::map(self.captured.borrow(), |c| c.as_slice())
    }

    /// Look up the currently bound value of a captured variable.
    pub fn capture(&self, name: &str) -> Option<Value> {
        self.captured
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}
