//! Parameter values.

use std::fmt;

use primfit_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::ParamError;

/// The kind of value a parameter holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Real number.
    Float,
    /// Integer (divisions, counts).
    Int,
    /// Boolean toggle.
    Bool,
    /// Three real components.
    Vector,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Float => "float",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Vector => "vector",
        };
        f.write_str(s)
    }
}

/// A value stored under a parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean.
    Bool(bool),
    /// Integer. Listed before `Float` so untagged input `3` stays an integer.
    Int(i64),
    /// Real number.
    Float(f64),
    /// Vector as `[x, y, z]`.
    Vector([f64; 3]),
}

impl ParamValue {
    /// Build a vector value.
    pub fn vector(v: Vec3) -> Self {
        ParamValue::Vector([v.x, v.y, v.z])
    }

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Float(_) => ValueKind::Float,
            ParamValue::Int(_) => ValueKind::Int,
            ParamValue::Bool(_) => ValueKind::Bool,
            ParamValue::Vector(_) => ValueKind::Vector,
        }
    }

    /// The value as a float, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a vector, if it is one.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            ParamValue::Vector([x, y, z]) => Some(Vec3::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// Multiply a float or every component of a vector by `factor`.
    ///
    /// Only real-valued parameters carry a size, so integers and booleans are
    /// rejected.
    pub fn scaled(&self, name: &str, factor: f64) -> Result<ParamValue, ParamError> {
        match self {
            ParamValue::Float(v) => Ok(ParamValue::Float(v * factor)),
            ParamValue::Vector([x, y, z]) => {
                Ok(ParamValue::Vector([x * factor, y * factor, z * factor]))
            }
            other => Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: ValueKind::Float,
                found: other.kind(),
            }),
        }
    }

    /// Multiply a vector component-wise by `factors`.
    pub fn scaled_per_axis(&self, name: &str, factors: &Vec3) -> Result<ParamValue, ParamError> {
        match self.as_vec3() {
            Some(v) => Ok(ParamValue::vector(v.component_mul(factors))),
            None => Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: ValueKind::Vector,
                found: self.kind(),
            }),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        ParamValue::vector(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Vector([x, y, z]) => write!(f, "({x}, {y}, {z})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_float_and_vector() {
        let r = ParamValue::Float(1.5).scaled("Radius", 2.0).unwrap();
        assert_eq!(r, ParamValue::Float(3.0));
        let v = ParamValue::Vector([1.0, 2.0, 3.0]).scaled("Size", 0.5).unwrap();
        assert_eq!(v, ParamValue::Vector([0.5, 1.0, 1.5]));
    }

    #[test]
    fn test_scaled_rejects_int() {
        let err = ParamValue::Int(8).scaled("Div Circle", 2.0).unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { found: ValueKind::Int, .. }));
    }

    #[test]
    fn test_scaled_per_axis() {
        let v = ParamValue::Vector([1.0, 2.0, 3.0])
            .scaled_per_axis("Size", &Vec3::new(2.0, 3.0, 4.0))
            .unwrap();
        assert_eq!(v, ParamValue::Vector([2.0, 6.0, 12.0]));
        assert!(ParamValue::Float(1.0)
            .scaled_per_axis("Size", &Vec3::new(1.0, 1.0, 1.0))
            .is_err());
    }
}
