#![warn(missing_docs)]

//! Axis-aligned bounding boxes over vertex sets.
//!
//! The box is computed in whatever frame the points are expressed in; the
//! converters feed it points already rotated into the estimated shape frame.

use nalgebra::Matrix3;
use primfit_math::{Point3, Vec3};
use thiserror::Error;

/// Errors from bounding box construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    /// Fewer than two points cannot define a usable shape.
    #[error("degenerate geometry: {count} point(s), at least 2 required")]
    DegenerateGeometry {
        /// Number of points supplied.
        count: usize,
    },
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Create a box from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Bounds of a point set in a single pass.
    ///
    /// # Errors
    ///
    /// [`BoundsError::DegenerateGeometry`] when fewer than two points are given.
    pub fn from_points(points: &[Point3]) -> Result<Self, BoundsError> {
        if points.len() < 2 {
            return Err(BoundsError::DegenerateGeometry {
                count: points.len(),
            });
        }
        let mut bbox = Self::empty();
        for p in points {
            bbox.include_point(p);
        }
        Ok(bbox)
    }

    /// Expand this box to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Extent along each axis (`max - min`).
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of [`size`](Self::size).
    pub fn half_extents(&self) -> Vec3 {
        self.size() / 2.0
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// The eight corners, bottom face first.
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, b.z),
            Point3::new(a.x, b.y, b.z),
        ]
    }

    /// Bounds of this box's corners under a linear map.
    ///
    /// For axis-aligned maps (per-axis scale, axis permutations) this equals
    /// the bounds of the mapped points.
    pub fn transformed(&self, linear: &Matrix3<f64>) -> Self {
        let mut out = Self::empty();
        for c in self.corners() {
            out.include_point(&Point3::from(linear * c.coords));
        }
        out
    }
}
