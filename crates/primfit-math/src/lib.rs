#![warn(missing_docs)]

//! Math types for primfit.
//!
//! Thin wrappers around nalgebra providing the domain types shared by every
//! primfit crate: points, vectors, rotations, the host object's
//! location/rotation/scale triple, and tolerance helpers.

use nalgebra::{UnitQuaternion, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in a 2D projection plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A unit quaternion rotation.
pub type Quat = UnitQuaternion<f64>;

/// Rotation about the X axis by `angle` radians.
pub fn rotation_x(angle: f64) -> Quat {
    Quat::from_axis_angle(&Vector3::x_axis(), angle)
}

/// Rotation about the Y axis by `angle` radians.
pub fn rotation_y(angle: f64) -> Quat {
    Quat::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Rotation about the Z axis by `angle` radians.
pub fn rotation_z(angle: f64) -> Quat {
    Quat::from_axis_angle(&Vector3::z_axis(), angle)
}

/// Location, rotation and scale of a host object.
///
/// The world position of a local point `p` is `location + rotation * (scale ∘ p)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// World-space location of the object origin.
    pub location: Vec3,
    /// Object rotation.
    pub rotation: Quat,
    /// Per-axis scale factors (may be negative).
    pub scale: Vec3,
}

impl ObjectTransform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            location: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Pure translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            location: Vec3::new(dx, dy, dz),
            ..Self::identity()
        }
    }

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale.
    pub fn with_scale(mut self, sx: f64, sy: f64, sz: f64) -> Self {
        self.scale = Vec3::new(sx, sy, sz);
        self
    }

    /// Transform a local point into world space.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.apply_vec(&p.coords) + self.location)
    }

    /// Transform a local direction (ignores location).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.rotation * self.scale.component_mul(v)
    }

    /// Whether the scale is (1, 1, 1) within `tol`.
    pub fn has_unit_scale(&self, tol: &Tolerance) -> bool {
        self.scale.iter().all(|s| tol.is_close(*s, 1.0))
    }

    /// Transform of a child placed inside this object.
    ///
    /// The child's origin sits at `local_origin` (in this object's local,
    /// unscaled space) and its axes are this object's axes rotated by
    /// `local_rotation`. The child inherits this object's scale re-expressed
    /// along its own axes; this is exact when `local_rotation` only permutes
    /// axes or when the scale is uniform.
    pub fn placed(&self, local_rotation: &Quat, local_origin: &Point3) -> Self {
        let basis = local_rotation.to_rotation_matrix().into_inner();
        let mut scale = Vec3::zeros();
        for i in 0..3 {
            let axis = basis.column(i).into_owned();
            scale[i] = axis.dot(&self.scale.component_mul(&axis));
        }
        Self {
            location: self.apply_point(local_origin).coords,
            rotation: self.rotation * local_rotation,
            scale,
        }
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Relative tolerance for comparing scale factors.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Largest accepted difference as a fraction of the larger magnitude.
    pub relative: f64,
}

impl Tolerance {
    /// Default tolerance (1e-6 relative).
    pub const DEFAULT: Self = Self { relative: 1e-6 };

    /// Relative comparison: `|a - b| <= relative * max(|a|, |b|)`.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.relative * a.abs().max(b.abs())
    }

    /// Every value is close to the first one.
    pub fn all_close(&self, values: &[f64]) -> bool {
        match values.split_first() {
            Some((first, rest)) => rest.iter().all(|v| self.is_close(*first, *v)),
            None => true,
        }
    }

    /// All three components are equal within the relative tolerance.
    pub fn is_uniform(&self, v: &Vec3) -> bool {
        self.all_close(&[v.x, v.y, v.z])
    }

    /// X and Y components are equal within the relative tolerance.
    pub fn is_xy_same(&self, v: &Vec3) -> bool {
        self.is_close(v.x, v.y)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Mean of absolute values. Returns 0 for an empty slice.
pub fn abs_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}
