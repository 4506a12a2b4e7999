#![warn(missing_docs)]

//! Fold an object's scale into its primitive parameters.
//!
//! After [`normalize`] succeeds the caller resets the object scale to
//! `(1, 1, 1)` and applies the returned [`Compensation`]; the primitive then
//! looks the same as before. Parameters are staged and written in one batch
//! only after every check passed, so a failure never leaves partial writes.

use std::fmt;

use primfit_math::{abs_mean, Tolerance, Vec3};
use primfit_params::{
    interface, names, ParamError, ParameterStore, ScaleAxis, ShapeType, StagedParams,
};
use thiserror::Error;

/// Errors from scale normalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// The scale cannot be folded into this shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing a parameter failed.
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// How much scale freedom a shape has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryClass {
    /// Any per-axis scale is representable.
    Free,
    /// Round about Z: X and Y must match.
    AxialZ,
    /// Round in every direction: the scale must be uniform.
    Full,
}

impl SymmetryClass {
    /// Class of `shape`.
    pub fn of(shape: ShapeType) -> Self {
        match shape {
            ShapeType::Cube | ShapeType::Grid | ShapeType::DeformableCube => SymmetryClass::Free,
            ShapeType::Cone
            | ShapeType::Cylinder
            | ShapeType::Tube
            | ShapeType::Gear
            | ShapeType::Capsule => SymmetryClass::AxialZ,
            ShapeType::Torus
            | ShapeType::UVSphere
            | ShapeType::ICOSphere
            | ShapeType::QuadSphere
            | ShapeType::Spring => SymmetryClass::Full,
        }
    }
}

/// A scale the shape can only approximate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleWarning {
    /// A fully symmetric shape was scaled non-uniformly.
    NonUniform {
        /// The object scale.
        scale: Vec3,
    },
    /// X and Y scale differ on a shape round about Z.
    XyMismatch {
        /// X scale.
        x: f64,
        /// Y scale.
        y: f64,
    },
    /// X and Y scale are equal but negative.
    NegativeXy {
        /// Shared XY scale.
        xy: f64,
    },
}

impl fmt::Display for ScaleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleWarning::NonUniform { scale } => write!(
                f,
                "object is not uniformly scaled: ({:.8}, {:.8}, {:.8})",
                scale.x, scale.y, scale.z
            ),
            ScaleWarning::XyMismatch { x, y } => {
                write!(f, "object XY scale is not equal: ({x:.8}, {y:.8})")
            }
            ScaleWarning::NegativeXy { xy } => {
                write!(f, "negative XY scale ({xy:.8}) can change the shape")
            }
        }
    }
}

/// Rotation the caller must append to the object after resetting its scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compensation {
    /// Nothing to do.
    #[default]
    None,
    /// Append a 180° turn about local X.
    RotateX180,
}

/// Result of a successful normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    /// Approximations made (always empty in strict mode).
    pub warnings: Vec<ScaleWarning>,
    /// Rotation to append to the object.
    pub compensation: Compensation,
    /// Number of parameters written.
    pub written: usize,
}

/// Symmetry violations of `scale` for `shape`.
pub fn check_scale(shape: ShapeType, scale: &Vec3) -> Vec<ScaleWarning> {
    let tol = Tolerance::DEFAULT;
    let mut warnings = Vec::new();
    match SymmetryClass::of(shape) {
        SymmetryClass::Free => {}
        SymmetryClass::AxialZ => {
            if !tol.is_xy_same(scale) {
                warnings.push(ScaleWarning::XyMismatch {
                    x: scale.x,
                    y: scale.y,
                });
            } else if scale.x < 0.0 {
                warnings.push(ScaleWarning::NegativeXy { xy: scale.x });
            }
        }
        SymmetryClass::Full => {
            if !tol.is_uniform(scale) {
                warnings.push(ScaleWarning::NonUniform { scale: *scale });
            }
        }
    }
    warnings
}

fn factor(axis: ScaleAxis, scale: &Vec3) -> f64 {
    match axis {
        ScaleAxis::X => scale.x.abs(),
        ScaleAxis::Y => scale.y.abs(),
        ScaleAxis::Z => scale.z.abs(),
        ScaleAxis::Xy => abs_mean(&[scale.x, scale.y]),
        ScaleAxis::Xyz | ScaleAxis::PerAxis => abs_mean(&[scale.x, scale.y, scale.z]),
    }
}

fn compensation(shape: ShapeType, scale: &Vec3) -> Compensation {
    match shape {
        ShapeType::Cone | ShapeType::Cylinder | ShapeType::Tube if scale.z < 0.0 => {
            Compensation::RotateX180
        }
        _ => Compensation::None,
    }
}

/// Fold `scale` into the parameters of `shape` held by `store`.
///
/// In strict mode every [`ScaleWarning`] becomes
/// [`NormalizeError::InvalidInput`]. Springs reject negative scale in either
/// mode. On error nothing is written.
pub fn normalize<S: ParameterStore + ?Sized>(
    shape: ShapeType,
    scale: &Vec3,
    store: &mut S,
    strict: bool,
) -> Result<NormalizeOutcome, NormalizeError> {
    if shape == ShapeType::Spring && scale.iter().any(|s| *s < 0.0) {
        return Err(NormalizeError::InvalidInput(
            "negative scaling is not supported".into(),
        ));
    }

    let warnings = check_scale(shape, scale);
    if strict {
        if let Some(first) = warnings.first() {
            return Err(NormalizeError::InvalidInput(first.to_string()));
        }
    }

    let mut staged = StagedParams::new(store);
    let magnitude = scale.abs();
    for def in shape.params() {
        let Some(axis) = def.scale_axis else {
            continue;
        };
        if axis == ScaleAxis::PerAxis {
            interface::modify(&mut staged, def.name, |v| v.scaled_per_axis(def.name, &magnitude))?;
        } else {
            let f = factor(axis, scale);
            interface::modify(&mut staged, def.name, |v| v.scaled(def.name, f))?;
        }
    }

    if shape == ShapeType::DeformableCube {
        for (axis, (min, max)) in names::MIN_MAX.iter().enumerate() {
            if scale[axis] < 0.0 {
                interface::swap(&mut staged, min, max)?;
            }
        }
    }

    let written = staged.commit()?;
    let compensation = compensation(shape, scale);
    log::debug!(
        "{shape}: folded scale ({}, {}, {}) into {written} parameter(s), {compensation:?}",
        scale.x,
        scale.y,
        scale.z
    );

    Ok(NormalizeOutcome {
        warnings,
        compensation,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use primfit_math::{rotation_x, rotation_z, ObjectTransform, Point3};
    use primfit_params::{MemoryStore, ParamValue};
    use std::f64::consts::PI;

    fn v(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3::new(x, y, z)
    }

    #[test]
    fn test_cylinder_round_trip() {
        let mut store = MemoryStore::new(ShapeType::Cylinder);
        let out = normalize(ShapeType::Cylinder, &v(2.0, 2.0, 3.0), &mut store, false).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.compensation, Compensation::None);
        assert_abs_diff_eq!(store.float(names::RADIUS).unwrap(), 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(store.float(names::HEIGHT).unwrap(), 6.0, epsilon = 1e-12);
        assert_eq!(store.read(names::DIV_CIRCLE), Some(ParamValue::Int(32)));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_cylinder_negative_z_rotates() {
        let mut store = MemoryStore::new(ShapeType::Cylinder);
        let before = ObjectTransform::translation(1.0, 2.0, 3.0)
            .with_rotation(rotation_z(0.7) * rotation_x(0.2))
            .with_scale(1.0, 1.0, -1.0);

        let out = normalize(ShapeType::Cylinder, &before.scale, &mut store, true).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.compensation, Compensation::RotateX180);
        assert_abs_diff_eq!(store.float(names::HEIGHT).unwrap(), 2.0);

        let after = ObjectTransform {
            rotation: before.rotation * rotation_x(PI),
            scale: v(1.0, 1.0, 1.0),
            ..before
        };

        // Surface samples of the unit cylinder, symmetric about the XZ plane.
        let samples: Vec<Point3> = (0..8)
            .flat_map(|k| {
                let a = k as f64 * PI / 4.0;
                [0.0, 1.0, 2.0].map(|h| Point3::new(a.cos(), a.sin(), h))
            })
            .collect();
        for p in &samples {
            let world = before.apply_point(p);
            let matched = samples
                .iter()
                .any(|q| (after.apply_point(q) - world).norm() < 1e-9);
            assert!(matched, "{p} not reproduced");
        }
    }

    #[test]
    fn test_strict_aborts_without_writes() {
        let mut store = MemoryStore::new(ShapeType::UVSphere);
        let err = normalize(ShapeType::UVSphere, &v(1.0, 1.0, 1.2), &mut store, true).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(_)));
        assert_eq!(store.float(names::RADIUS), Some(1.0));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_non_strict_averages() {
        let mut store = MemoryStore::new(ShapeType::UVSphere);
        let out = normalize(ShapeType::UVSphere, &v(1.0, 1.0, 1.3), &mut store, false).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(matches!(out.warnings[0], ScaleWarning::NonUniform { .. }));
        assert_abs_diff_eq!(store.float(names::RADIUS).unwrap(), 1.1, epsilon = 1e-12);

        let mut cone = MemoryStore::new(ShapeType::Cone);
        let out = normalize(ShapeType::Cone, &v(1.0, 3.0, 2.0), &mut cone, false).unwrap();
        assert_eq!(out.warnings, vec![ScaleWarning::XyMismatch { x: 1.0, y: 3.0 }]);
        assert_abs_diff_eq!(cone.float(names::BOTTOM_RADIUS).unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cone.float(names::HEIGHT).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_xy_warns() {
        let mut store = MemoryStore::new(ShapeType::Tube);
        let out = normalize(ShapeType::Tube, &v(-2.0, -2.0, 1.0), &mut store, false).unwrap();
        assert_eq!(out.warnings, vec![ScaleWarning::NegativeXy { xy: -2.0 }]);
        assert_abs_diff_eq!(store.float(names::OUTER_RADIUS).unwrap(), 2.0);

        let mut strict = MemoryStore::new(ShapeType::Tube);
        assert!(normalize(ShapeType::Tube, &v(-2.0, -2.0, 1.0), &mut strict, true).is_err());
    }

    #[test]
    fn test_deformable_cube_swaps() {
        let mut store = MemoryStore::with_values(
            ShapeType::DeformableCube,
            [
                (names::MIN_X, ParamValue::Float(0.25)),
                (names::MAX_X, ParamValue::Float(2.0)),
                (names::MIN_Y, ParamValue::Float(0.5)),
                (names::MAX_Z, ParamValue::Float(3.0)),
            ],
        )
        .unwrap();
        let out =
            normalize(ShapeType::DeformableCube, &v(-1.0, 1.0, 1.0), &mut store, true).unwrap();
        assert_eq!(out.compensation, Compensation::None);
        assert_eq!(store.float(names::MIN_X), Some(2.0));
        assert_eq!(store.float(names::MAX_X), Some(0.25));
        assert_eq!(store.float(names::MIN_Y), Some(0.5));
        assert_eq!(store.float(names::MAX_Y), Some(1.0));
        assert_eq!(store.float(names::MAX_Z), Some(3.0));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_deformable_cube_scales_then_swaps() {
        let mut store = MemoryStore::with_values(
            ShapeType::DeformableCube,
            [(names::MIN_Z, ParamValue::Float(1.0)), (names::MAX_Z, ParamValue::Float(3.0))],
        )
        .unwrap();
        normalize(ShapeType::DeformableCube, &v(2.0, 1.0, -0.5), &mut store, true).unwrap();
        assert_eq!(store.float(names::MIN_X), Some(2.0));
        assert_eq!(store.float(names::MIN_Z), Some(1.5));
        assert_eq!(store.float(names::MAX_Z), Some(0.5));
    }

    #[test]
    fn test_spring_rejects_negative() {
        for scale in [v(-1.0, 1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, -1.0)] {
            for strict in [true, false] {
                let mut store = MemoryStore::new(ShapeType::Spring);
                let err = normalize(ShapeType::Spring, &scale, &mut store, strict).unwrap_err();
                assert!(matches!(err, NormalizeError::InvalidInput(_)));
                assert_eq!(store, MemoryStore::new(ShapeType::Spring));
            }
        }
    }

    #[test]
    fn test_cube_per_axis() {
        let mut store = MemoryStore::new(ShapeType::Cube);
        normalize(ShapeType::Cube, &v(2.0, -3.0, 0.5), &mut store, true).unwrap();
        assert_eq!(store.read(names::SIZE), Some(ParamValue::Vector([2.0, 3.0, 0.5])));
    }

    #[test]
    fn test_every_shape_identity_scale() {
        for shape in ShapeType::ALL {
            let mut store = MemoryStore::new(shape);
            let out = normalize(shape, &v(1.0, 1.0, 1.0), &mut store, true).unwrap();
            assert!(out.warnings.is_empty());
            assert_eq!(out.compensation, Compensation::None);
            for def in shape.params() {
                assert_eq!(store.read(def.name), Some(def.default), "{shape}.{}", def.name);
            }
        }
    }

    #[test]
    fn test_symmetry_classes() {
        assert_eq!(SymmetryClass::of(ShapeType::Capsule), SymmetryClass::AxialZ);
        assert_eq!(SymmetryClass::of(ShapeType::Spring), SymmetryClass::Full);
        assert!(check_scale(ShapeType::Grid, &v(1.0, -5.0, 0.1)).is_empty());
    }
}
