//! `amber-eval` implements the Amber expression language.
//!
//! Amber is a small, single-threaded scripting language in which
//! functions are written as literals with an *explicit* capture
//! clause:
//!
//! ```text
//! let a = 10;
//! let g = fn (x) use (a) { x + a };
//! g(5)
//! ```
//!
//! A function body resolves exactly three kinds of names: its
//! parameters, the names listed in its `use (...)` clause, and the
//! global builtins. Captures are snapshotted by value when the
//! literal is evaluated, which keeps every capture graph acyclic.
//!
//! All source text handed to the runtime (files, REPL input,
//! re-evaluated snippets) is registered in a shared [`SourceCode`]
//! map, so every function value can be traced back to the file and
//! line range of the literal that produced it. The [`Reflect`] trait
//! exposes that information to consumers such as `amber-wrap` without
//! tying them to the runtime's internals.

mod builtins;
mod env;
mod errors;
mod reflect;
mod runtime;
mod source;
mod syntax;
mod value;

#[cfg(test)]
mod tests;

// Re-export the public interface used by other crates.
pub use crate::builtins::global_builtins;
pub use crate::errors::{Error, ErrorKind, EvalResult};
pub use crate::reflect::{Reflect, SourceLocation};
pub use crate::runtime::Runtime;
pub use crate::source::SourceCode;
pub use crate::value::{Builtin, BuiltinFn, Closure, Lambda, Value};
