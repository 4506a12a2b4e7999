//! 2D convex hull and minimum-width search.

use primfit_math::{Point2, Vec2};

use crate::AxisError;

/// Squared distance under which two projected points count as one.
pub const DUPLICATE_EPS_SQ: f64 = 1e-12;

/// Result of the minimum-width scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinWidth {
    /// Unit normal of the winning edge, pointing into the hull.
    pub normal: Vec2,
    /// Extent of the hull along `normal`.
    pub width: f64,
    /// Index of the winning edge (from hull vertex `edge` to `edge + 1`).
    pub edge: usize,
}

fn cross(o: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (u, v) = (a - o, b - o);
    u.x * v.y - u.y * v.x
}

fn near(a: &Point2, b: &Point2) -> bool {
    (a - b).norm_squared() <= DUPLICATE_EPS_SQ
}

/// Convex hull by Andrew's monotone chain.
///
/// Vertices come back counter-clockwise starting at the lowest-x (then
/// lowest-y) point. Collinear points are dropped and near-duplicates collapsed,
/// so a collinear input yields its two endpoints and a single repeated point
/// yields one vertex.
pub fn convex_hull_2d(points: &[Point2]) -> Vec<Point2> {
    let mut sorted: Vec<Point2> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|b, a| near(a, b));

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point2> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while let [.., a, b] = lower[..] {
            if cross(&a, &b, p) > 0.0 {
                break;
            }
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while let [.., a, b] = upper[..] {
            if cross(&a, &b, p) > 0.0 {
                break;
            }
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);

    // Sorting only brings near-duplicates together along x; catch the rest
    // on the closed hull.
    let mut hull: Vec<Point2> = Vec::with_capacity(lower.len());
    for p in lower {
        if hull.last().is_some_and(|q| near(q, &p)) {
            continue;
        }
        hull.push(p);
    }
    while hull.len() > 1 && near(&hull[0], &hull[hull.len() - 1]) {
        hull.pop();
    }
    hull
}

/// Direction across which a counter-clockwise hull is narrowest.
///
/// Every edge is tried; its inward normal is measured by the largest
/// projection of the hull vertices from the edge start. The smallest such
/// extent wins and ties keep the earliest edge.
///
/// # Errors
///
/// [`AxisError::DegenerateGeometry`] when the hull has fewer than two vertices.
pub fn min_width_direction(hull: &[Point2]) -> Result<MinWidth, AxisError> {
    if hull.len() < 2 {
        return Err(AxisError::DegenerateGeometry(format!(
            "convex hull has {} vertex(es)",
            hull.len()
        )));
    }

    let n = hull.len();
    let mut best: Option<MinWidth> = None;
    for i in 0..n {
        let start = hull[i];
        let dir = hull[(i + 1) % n] - start;
        let len = dir.norm();
        if len * len <= DUPLICATE_EPS_SQ {
            continue;
        }
        let normal = Vec2::new(-dir.y, dir.x) / len;
        let width = hull
            .iter()
            .map(|p| (p - start).dot(&normal))
            .fold(f64::NEG_INFINITY, f64::max);

        if best.is_none_or(|b| width < b.width) {
            best = Some(MinWidth {
                normal,
                width,
                edge: i,
            });
        }
    }

    best.ok_or_else(|| AxisError::DegenerateGeometry("convex hull has no usable edge".into()))
}
