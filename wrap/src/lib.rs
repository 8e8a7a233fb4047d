//! `amber-wrap` wraps a live Amber closure and adds two capabilities
//! the raw value does not have: recovering the exact literal text
//! that defined it (together with the names and values it captured),
//! and serializing it into a durable form from which a live,
//! callable closure can be reconstructed later — in another runtime,
//! on another machine.
//!
//! Wrapping composes three steps: locate the literal through the
//! runtime's [`Reflect`](amber_eval::Reflect) queries, trim the
//! located lines down to exactly the function literal, and resolve
//! the literal's capture clause against the closure's live captured
//! values. Captured values that are themselves closures are wrapped
//! recursively and marked as nested, so arbitrary capture trees
//! round-trip.
//!
//! Reconstruction runs the pipeline in reverse: nested entries are
//! reconstructed first, all captured bindings are injected into a
//! fresh evaluation scope, and the recovered source is re-evaluated
//! there. The resulting wrapper is built by re-running the wrap path
//! against the fresh closure, so it is indistinguishable from one
//! wrapped directly.
//!
//! The re-evaluated source is trusted; vetting it is the caller's
//! responsibility.

mod captures;
mod error;
mod extract;
mod locate;
mod persist;
mod reconstruct;
mod wrap;

#[cfg(test)]
mod tests;

pub use crate::error::{Error, Result};
pub use crate::persist::{PersistedClosure, PersistedValue};
pub use crate::wrap::{Captured, WrappedClosure};
