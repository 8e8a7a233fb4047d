//! Locating the defining source of a live callable.

use amber_eval::{Reflect, SourceLocation, Value};

use crate::error::{Error, Result};

/// Resolve the file and line range of the literal behind `value`.
///
/// Values that are not callable at all are rejected outright;
/// callables without source (builtins) report that their text is
/// unavailable.
pub(crate) fn locate<R: Reflect>(reflector: &R, value: &Value) -> Result<SourceLocation> {
    if !value.is_callable() {
        return Err(Error::NotAClosure {
            actual: value.type_of(),
        });
    }

    reflector.location(value).ok_or_else(|| {
        let what = match value {
            Value::Builtin(builtin) => builtin.name(),
            _ => value.type_of(),
        };

        Error::SourceUnavailable { what }
    })
}
