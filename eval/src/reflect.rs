//! Interface for reflecting on live function values.
//!
//! The Amber runtime knows, for every closure it has minted, where
//! the literal came from (file and line range in the source map),
//! which parameters it declares, and which values its capture clause
//! snapshotted. Consumers that want to introspect closures — such as
//! the `amber-wrap` crate, which recovers and serializes closure
//! source — should not depend on the runtime's internals for this,
//! so the queries are grouped into a trait that can also be
//! implemented by test stubs.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::runtime::Runtime;
use crate::value::Value;

/// The place a function literal was defined: a file in the source
/// map, and the 1-based, inclusive line range its text spans.
#[derive(Clone)]
pub struct SourceLocation {
    pub file: Arc<codemap::File>,
    pub start_line: usize,
    pub end_line: usize,
}

impl SourceLocation {
    /// Name under which the defining file is registered; a filesystem
    /// path for scripts loaded from disk.
    pub fn path(&self) -> &str {
        self.file.name()
    }
}

/// Read-only introspection queries over live values.
pub trait Reflect {
    /// The source location of the literal that produced the value.
    /// `None` for values that have no retrievable source, such as
    /// builtins or plain data.
    fn location(&self, value: &Value) -> Option<SourceLocation>;

    /// The declared parameter names, if the value is a closure.
    fn parameters(&self, value: &Value) -> Option<Vec<SmolStr>>;

    /// The capture-clause snapshot of the value: name → currently
    /// bound value, in clause order. `None` if the value is not a
    /// closure.
    fn captured(&self, value: &Value) -> Option<Vec<(SmolStr, Value)>>;
}

impl Reflect for Runtime {
    fn location(&self, value: &Value) -> Option<SourceLocation> {
        let closure = value.to_closure()?;
        let (file, start_line, end_line) = self.source_map().get_lines(closure.lambda.span);

        Some(SourceLocation {
            file,
            start_line,
            end_line,
        })
    }

    fn parameters(&self, value: &Value) -> Option<Vec<SmolStr>> {
        Some(value.to_closure()?.lambda.params.clone())
    }

    fn captured(&self, value: &Value) -> Option<Vec<(SmolStr, Value)>> {
        Some(value.to_closure()?.captured().to_vec())
    }
}
