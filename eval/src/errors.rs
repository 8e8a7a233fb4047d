//! Error types for Amber lexing, parsing and evaluation.

use std::error;
use std::fmt::Display;

use codemap::Span;
use smol_str::SmolStr;

use crate::source::SourceCode;

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// Input that the lexer or parser could not make sense of.
    SyntaxError(String),

    /// An identifier that does not resolve in the current scope.
    /// Function bodies only see their parameters, their `use`-clause
    /// names and the global builtins, so this is also the error
    /// reported when a capture clause names an unbound variable.
    UnknownVariable(SmolStr),

    /// A value of one type showed up where another was required.
    TypeError {
        expected: &'static str,
        actual: &'static str,
    },

    /// Attempted to call a value that is not callable.
    NotCallable(&'static str),

    /// A function was applied to the wrong number of arguments.
    WrongArgumentCount { expected: usize, actual: usize },

    /// Integer arithmetic outside the 64-bit range.
    IntegerOverflow,

    /// Integer division or remainder by zero.
    DivisionByZero,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::SyntaxError(msg) => write!(f, "syntax error: {}", msg),

            ErrorKind::UnknownVariable(name) => {
                write!(f, "variable '{}' is not bound in this scope", name)
            }

            ErrorKind::TypeError { expected, actual } => {
                write!(f, "expected a value of type {}, but got {}", expected, actual)
            }

            ErrorKind::NotCallable(actual) => {
                write!(f, "attempted to call a value of type {}", actual)
            }

            ErrorKind::WrongArgumentCount { expected, actual } => write!(
                f,
                "function expects {} argument(s), but was called with {}",
                expected, actual
            ),

            ErrorKind::IntegerOverflow => write!(f, "integer arithmetic overflowed"),

            ErrorKind::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

/// An error that occurred somewhere in source code, together with the
/// span it occurred at (if one is known).
#[derive(Clone, Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Option<Span>,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Error {
            kind,
            span: Some(span),
        }
    }

    /// Render the error with file/line information resolved against
    /// the given source map.
    pub fn fancy_format_str(&self, source: &SourceCode) -> String {
        match self.span {
            Some(span) => {
                let loc = source.codemap().look_up_span(span);
                format!(
                    "error: {} at {}:{}",
                    self.kind,
                    loc.file.name(),
                    loc.begin.line + 1
                )
            }
            None => format!("error: {}", self.kind),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind, span: None }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl error::Error for Error {}

pub type EvalResult<T> = Result<T, Error>;
