//! This module contains utilities for dealing with the codemap that
//! is shared by everything evaluated inside one runtime.
//!
//! The data type `SourceCode` should be carried through all relevant
//! places instead of copying the codemap structures directly.

use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
    sync::Arc,
};

use codemap::{CodeMap, Span};

/// Tracks all source code evaluated in one Amber runtime, for error
/// reporting and for recovering the literal text of function values.
#[derive(Clone)]
pub struct SourceCode(Rc<RefCell<CodeMap>>);

impl SourceCode {
    pub fn new() -> Self {
        SourceCode(Rc::new(RefCell::new(CodeMap::new())))
    }

    /// Access a read-only reference to the codemap.
    pub fn codemap(&self) -> Ref<'_, CodeMap> {
        self.0.borrow()
    }

    /// Access a writable reference to the codemap.
    fn codemap_mut(&self) -> RefMut<'_, CodeMap> {
        self.0.borrow_mut()
    }

    /// Add a file to the codemap. The returned Arc is managed by the
    /// codemap internally and can be used like a normal reference.
    pub fn add_file(&self, name: String, code: String) -> Arc<codemap::File> {
        self.codemap_mut().add_file(name, code)
    }

    /// Retrieve the line number of the given span. If it spans
    /// multiple lines, the first line will be returned.
    pub fn get_line(&self, span: Span) -> usize {
        // lines are 0-indexed in the codemap, but users probably want
        // real line numbers
        self.codemap().look_up_span(span).begin.line + 1
    }

    /// Retrieve the file and the 1-based, inclusive line range
    /// covered by the given span.
    pub fn get_lines(&self, span: Span) -> (Arc<codemap::File>, usize, usize) {
        let loc = self.codemap().look_up_span(span);
        (loc.file, loc.begin.line + 1, loc.end.line + 1)
    }

    /// Returns the literal source of the given span as an owned string.
    pub fn source_slice(&self, span: Span) -> String {
        self.codemap()
            .find_file(span.low())
            .source_slice(span)
            .to_owned()
    }
}

impl Default for SourceCode {
    fn default() -> Self {
        Self::new()
    }
}
