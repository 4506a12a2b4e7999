//! Principal component analysis of a point cloud.

use nalgebra::{Matrix3, SymmetricEigen};
use primfit_math::{Point3, Vec3};

use crate::AxisError;

/// Principal axes of a point set, strongest spread first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    /// Mean of the points.
    pub centroid: Point3,
    /// Covariance eigenvalues, descending.
    pub variances: [f64; 3],
    /// Unit eigenvectors matching `variances`.
    pub axes: [Vec3; 3],
}

impl PrincipalAxes {
    /// Direction of largest spread.
    pub fn primary(&self) -> Vec3 {
        self.axes[0]
    }
}

/// Eigen-decomposition of the covariance of `points`.
///
/// # Errors
///
/// [`AxisError::DegenerateGeometry`] for fewer than two points.
pub fn principal_axes(points: &[Point3]) -> Result<PrincipalAxes, AxisError> {
    if points.len() < 2 {
        return Err(AxisError::DegenerateGeometry(format!(
            "{} point(s), at least 2 required",
            points.len()
        )));
    }

    let n = points.len() as f64;
    let centroid = Point3::from(points.iter().fold(Vec3::zeros(), |acc, p| acc + p.coords) / n);

    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p - centroid;
        cov += d * d.transpose();
    }
    cov /= n;

    let eigen = SymmetricEigen::new(cov);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let variances = order.map(|i| eigen.eigenvalues[i]);
    let axes = order.map(|i| eigen.eigenvectors.column(i).normalize());
    log::debug!("principal variances {:?}", variances);

    Ok(PrincipalAxes {
        centroid,
        variances,
        axes,
    })
}
