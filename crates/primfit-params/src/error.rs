//! Error types for parameter access.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors from the parameter interface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The shape's parameter set has no entry with this name.
    #[error("parameter not found: {0}")]
    NotFound(String),

    /// A value of the wrong kind was read or written.
    #[error("parameter {name} expects {expected}, got {found}")]
    TypeMismatch {
        /// Parameter name.
        name: String,
        /// Declared kind.
        expected: ValueKind,
        /// Kind actually supplied.
        found: ValueKind,
    },

    /// The host tagged the object with a shape name we do not know.
    #[error("unknown primitive type: {0}")]
    UnknownType(String),

    /// Default values for a shape could not be loaded.
    #[error("defaults unavailable for {shape}: {reason}")]
    DefaultsUnavailable {
        /// Shape name.
        shape: String,
        /// Reason reported by the source.
        reason: String,
    },
}
