//! Error types for primfit operations.

use primfit_axis::AxisError;
use primfit_bounds::BoundsError;
use primfit_convert::ConvertError;
use primfit_normalize::NormalizeError;
use primfit_params::ParamError;
use thiserror::Error;

/// Broad classification of a [`PrimfitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Too few usable points, or a collapsed convex hull.
    DegenerateGeometry,
    /// Automatic axis estimation on a non-uniformly scaled object.
    NonUniformScale,
    /// A scale or value the operation cannot accept.
    InvalidInput,
    /// The object is tagged with an unknown primitive type.
    UnknownType,
    /// A parameter name is missing from the shape.
    ParameterNotFound,
    /// Settings failed to parse or validate.
    InvalidSettings,
}

/// Errors returned by primfit operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrimfitError {
    /// Bounding box construction failed.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Parameter access failed.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Frame estimation failed.
    #[error(transparent)]
    Axis(#[from] AxisError),

    /// Shape conversion failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Scale normalization failed.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The operation does not apply to this primitive type.
    #[error("{operation} requires a {expected} primitive, got {found}")]
    WrongType {
        /// Operation name.
        operation: &'static str,
        /// Required type name.
        expected: &'static str,
        /// Actual type name.
        found: String,
    },

    /// Invalid settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

fn param_kind(err: &ParamError) -> ErrorKind {
    match err {
        ParamError::NotFound(_) => ErrorKind::ParameterNotFound,
        ParamError::UnknownType(_) => ErrorKind::UnknownType,
        ParamError::TypeMismatch { .. } | ParamError::DefaultsUnavailable { .. } => {
            ErrorKind::InvalidInput
        }
    }
}

impl PrimfitError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrimfitError::Bounds(BoundsError::DegenerateGeometry { .. }) => {
                ErrorKind::DegenerateGeometry
            }
            PrimfitError::Param(e) => param_kind(e),
            PrimfitError::Axis(AxisError::NonUniformScale { .. }) => ErrorKind::NonUniformScale,
            PrimfitError::Axis(AxisError::DegenerateGeometry(_)) => ErrorKind::DegenerateGeometry,
            PrimfitError::Convert(ConvertError::Bounds(_)) => ErrorKind::DegenerateGeometry,
            PrimfitError::Convert(ConvertError::Param(e)) => param_kind(e),
            PrimfitError::Normalize(NormalizeError::InvalidInput(_)) => ErrorKind::InvalidInput,
            PrimfitError::Normalize(NormalizeError::Param(e)) => param_kind(e),
            PrimfitError::WrongType { .. } => ErrorKind::InvalidInput,
            PrimfitError::InvalidSettings(_) => ErrorKind::InvalidSettings,
        }
    }
}

/// Result type for primfit operations.
pub type Result<T> = std::result::Result<T, PrimfitError>;
