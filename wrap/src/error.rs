//! When wrapping or reconstructing a closure goes wrong ...

use std::error;
use std::fmt::Display;

use smol_str::SmolStr;

#[derive(Clone, Debug)]
pub enum Error {
    /// Attempted to wrap a value that is not callable at all.
    NotAClosure { actual: &'static str },

    /// The callable has no retrievable source text (it is backed by
    /// native code, like a builtin).
    SourceUnavailable { what: &'static str },

    /// The located source window contains no `fn` keyword.
    NoFunctionLiteral,

    /// The located source window ends before the brace opened by the
    /// function literal is balanced again.
    UnbalancedBraces,

    /// The literal carries a `use` marker, but no well-formed
    /// parenthesised name list follows it.
    MalformedCaptureClause,

    /// The capture clause names a variable that is absent from the
    /// closure's live captured-variable set. The static text and the
    /// runtime bindings must agree.
    UndefinedCapture { name: SmolStr },

    /// A closure was reached again while its own captures were still
    /// being wrapped — a self-referential capture, which the
    /// persisted form cannot represent.
    CaptureCycle { name: SmolStr },

    /// A persisted structure that violates its own invariants.
    InvalidForm { reason: &'static str },

    /// Evaluation of recovered source failed during reconstruction.
    Evaluation(amber_eval::Error),

    /// Evaluation of recovered source succeeded, but did not produce
    /// a closure.
    NotAFunction { actual: &'static str },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotAClosure { actual } => {
                write!(f, "can not wrap a value of type {}", actual)
            }

            Error::SourceUnavailable { what } => {
                write!(f, "'{}' has no retrievable source text", what)
            }

            Error::NoFunctionLiteral => {
                write!(f, "located source lines contain no function literal")
            }

            Error::UnbalancedBraces => {
                write!(
                    f,
                    "function literal is not brace-balanced within its source lines"
                )
            }

            Error::MalformedCaptureClause => {
                write!(f, "'use' marker is not followed by a parenthesised name list")
            }

            Error::UndefinedCapture { name } => write!(
                f,
                "capture clause names '{}', which the closure did not capture",
                name
            ),

            Error::CaptureCycle { name } => write!(
                f,
                "captured closure '{}' directly or indirectly captures itself",
                name
            ),

            Error::InvalidForm { reason } => {
                write!(f, "invalid persisted closure: {}", reason)
            }

            Error::Evaluation(err) => {
                write!(f, "reconstructed source failed to evaluate: {}", err)
            }

            Error::NotAFunction { actual } => write!(
                f,
                "reconstructed source evaluated to {}, not to a function",
                actual
            ),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Evaluation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
