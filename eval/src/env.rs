//! Runtime scopes.
//!
//! Name resolution in Amber is deliberately shallow: a function body
//! sees its parameters, its captured names and the globals, nothing
//! else. Scopes are therefore short `Rc`-linked chains (call frame →
//! globals, or script frame → globals), and creating one is cheap —
//! which is what makes it viable to hand every script evaluation and
//! every reconstruction its own isolated frame.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::value::Value;

#[derive(Debug, Default)]
pub(crate) struct Env {
    bindings: RefCell<FxHashMap<SmolStr, Value>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create a fresh scope nested inside this one.
    pub(crate) fn child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Env {
            bindings: Default::default(),
            parent: Some(self.clone()),
        })
    }

    /// Bind a name in this scope, shadowing any previous binding of
    /// the same name.
    pub(crate) fn define(&self, name: SmolStr, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Resolve a name against this scope and its parents.
    pub(crate) fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }
}
