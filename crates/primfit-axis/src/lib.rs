#![warn(missing_docs)]

//! Best-fit frame estimation for primitive conversion.
//!
//! Given the vertices of an object, find the orientation in which the mesh
//! reads as a canonical primitive: Z along the height, Y across the narrowest
//! width of the cross-section, X completing a right-handed frame.
//!
//! The automatic estimator works in two passes:
//! 1. **PCA** picks the direction of largest spread as the height candidate.
//! 2. **Minimum width** projects the points onto the plane normal to that
//!    direction and scans the edges of their 2D convex hull for the narrowest
//!    extent, which becomes the secondary axis.

pub mod hull;
pub mod pca;

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Matrix3, Rotation3};
use primfit_math::{rotation_x, rotation_y, Point2, Point3, Quat, Tolerance, Vec3};
use thiserror::Error;

pub use hull::{convex_hull_2d, min_width_direction, MinWidth};
pub use pca::{principal_axes, PrincipalAxes};

/// Errors from frame estimation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    /// Automatic estimation is undefined on non-uniformly scaled objects.
    #[error("auto axis requires a uniform scale, got ({x}, {y}, {z})")]
    NonUniformScale {
        /// X scale.
        x: f64,
        /// Y scale.
        y: f64,
        /// Z scale.
        z: f64,
    },

    /// Too few usable points to define a frame.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Toggles of the automatic estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoAxisOptions {
    /// Use the narrowest direction as height instead of the longest.
    pub narrow_axis_as_height: bool,
    /// Invert the up/down decision.
    pub invert_main_axis: bool,
}

/// How the height axis is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    /// Estimate from the geometry.
    Auto(AutoAxisOptions),
    /// Object X becomes the height axis.
    ForceX,
    /// Object Y becomes the height axis.
    ForceY,
    /// Keep object Z as the height axis.
    ForceZ,
}

impl Default for AxisMode {
    fn default() -> Self {
        AxisMode::Auto(AutoAxisOptions::default())
    }
}

/// The estimated shape frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    /// Rotation whose matrix columns are the frame X, Y, Z axes in object space.
    pub pre_rotation: Quat,
    /// Whether a 180° turn about Y was folded into `pre_rotation`.
    pub flip: bool,
}

impl AxisFrame {
    /// Frame equal to object space.
    pub fn identity() -> Self {
        Self::fixed(Quat::identity())
    }

    /// Unflipped frame with the given rotation.
    pub fn fixed(pre_rotation: Quat) -> Self {
        Self {
            pre_rotation,
            flip: false,
        }
    }

    /// Express an object-space point in frame coordinates.
    pub fn to_frame(&self, p: &Point3) -> Point3 {
        self.pre_rotation.inverse_transform_point(p)
    }

    /// Express a frame point back in object space.
    pub fn from_frame(&self, p: &Point3) -> Point3 {
        self.pre_rotation * p
    }

    /// Frame axes in object space as `[x, y, z]`.
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.pre_rotation * Vec3::x(),
            self.pre_rotation * Vec3::y(),
            self.pre_rotation * Vec3::z(),
        ]
    }
}

/// Estimate the shape frame of an object.
///
/// `points` are object-space vertices and `object_scale` is the object's
/// current scale. Forced modes ignore both.
///
/// # Errors
///
/// - [`AxisError::NonUniformScale`] when auto mode meets a non-uniform scale.
/// - [`AxisError::DegenerateGeometry`] for fewer than two points or a hull
///   that collapses to a single vertex.
pub fn estimate_frame(
    points: &[Point3],
    object_scale: &Vec3,
    mode: AxisMode,
) -> Result<AxisFrame, AxisError> {
    let options = match mode {
        AxisMode::Auto(options) => options,
        AxisMode::ForceX => return Ok(AxisFrame::fixed(rotation_y(FRAC_PI_2))),
        AxisMode::ForceY => return Ok(AxisFrame::fixed(rotation_x(-FRAC_PI_2))),
        AxisMode::ForceZ => return Ok(AxisFrame::identity()),
    };

    if !Tolerance::DEFAULT.is_uniform(object_scale) {
        return Err(AxisError::NonUniformScale {
            x: object_scale.x,
            y: object_scale.y,
            z: object_scale.z,
        });
    }

    let pca = principal_axes(points)?;
    let mut z_axis = pca.primary();

    // Bring the height candidate onto world Z and look at the cross-section.
    let to_z = Quat::rotation_between(&z_axis, &Vec3::z()).unwrap_or_else(|| rotation_x(PI));
    let projected: Vec<Point2> = points
        .iter()
        .map(|p| {
            let q = to_z * p;
            Point2::new(q.x, q.y)
        })
        .collect();

    let hull = convex_hull_2d(&projected);
    let width = min_width_direction(&hull)?;
    log::debug!(
        "hull of {} vertices, narrowest edge {} width {:.6}",
        hull.len(),
        width.edge,
        width.width
    );

    let mut y_axis = to_z.inverse() * Vec3::new(width.normal.x, width.normal.y, 0.0);
    y_axis = (y_axis - z_axis * z_axis.dot(&y_axis)).normalize();
    let mut x_axis = y_axis.cross(&z_axis);

    if options.narrow_axis_as_height {
        std::mem::swap(&mut z_axis, &mut y_axis);
        x_axis = -x_axis;
    }

    let basis = Matrix3::from_columns(&[x_axis, y_axis, z_axis]);
    let mut pre_rotation = Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis));

    let points_down = (pre_rotation * Vec3::z()).z < 0.0;
    let flip = points_down != options.invert_main_axis;
    if flip {
        pre_rotation *= rotation_y(PI);
    }

    log::debug!("frame z axis {:?}, flip {}", pre_rotation * Vec3::z(), flip);
    Ok(AxisFrame { pre_rotation, flip })
}
