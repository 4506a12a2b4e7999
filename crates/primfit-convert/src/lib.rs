#![warn(missing_docs)]

//! Fit primitive parameters to a bounding box.
//!
//! Every converter receives the bounding box of a mesh, and for the cone its
//! vertices, expressed in the shape frame (Z = height). It returns the
//! parameter values to write and where the primitive's origin goes relative
//! to the box centre. Converters are pure; placing the new object is up to
//! the caller.

use primfit_bounds::{BoundingBox, BoundsError};
use primfit_math::{Point3, Vec3};
use primfit_params::{names, ParamError, ParamValue, ScaleAxis, ShapeType};
use thiserror::Error;

/// Smallest radius a converter will produce.
pub const MIN_RADIUS: f64 = 1e-3;

/// Smallest length a converter will produce.
pub const MIN_SIZE: f64 = 1e-3;

/// Errors from shape conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The mesh does not define a usable box.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// A parameter could not be derived from the shape's defaults.
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Parameters fitted to a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Target shape.
    pub shape: ShapeType,
    /// Values to write, in table order.
    pub params: Vec<(&'static str, ParamValue)>,
    /// Primitive origin relative to the box centre, in frame coordinates.
    pub offset: Vec3,
}

impl Conversion {
    fn new(shape: ShapeType, params: Vec<(&'static str, ParamValue)>) -> Self {
        Self {
            shape,
            params,
            offset: Vec3::zeros(),
        }
    }

    fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Value assigned to `name`, if any.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

/// Fit `shape` to a bounding box in the shape frame.
///
/// `verts` must be the points the box was computed from; only the cone reads
/// them.
pub fn convert(
    shape: ShapeType,
    bbox: &BoundingBox,
    verts: &[Point3],
) -> Result<Conversion, ConvertError> {
    let size = bbox.size();
    let half = bbox.half_extents().map(|h| h.max(MIN_SIZE));
    let conversion = match shape {
        ShapeType::Cube => cube(&half),
        ShapeType::DeformableCube => deformable_cube(&half),
        ShapeType::Grid => grid(&half),
        ShapeType::Cone => cone(bbox, verts),
        ShapeType::Cylinder => cylinder(&size),
        ShapeType::Tube => tube(&size),
        ShapeType::Capsule => capsule(&size),
        ShapeType::Torus => torus(&size),
        ShapeType::UVSphere | ShapeType::ICOSphere | ShapeType::QuadSphere => sphere(shape, &size),
        ShapeType::Gear => gear(&size)?,
        ShapeType::Spring => spring(&size)?,
    };
    Ok(conversion)
}

/// Bounds of `verts` followed by [`convert`].
pub fn fit(shape: ShapeType, verts: &[Point3]) -> Result<(BoundingBox, Conversion), ConvertError> {
    let bbox = BoundingBox::from_points(verts)?;
    let conversion = convert(shape, &bbox, verts)?;
    Ok((bbox, conversion))
}

fn xy_radius(size: &Vec3) -> f64 {
    ((size.x + size.y) / 4.0).max(MIN_RADIUS)
}

fn cube(half: &Vec3) -> Conversion {
    Conversion::new(ShapeType::Cube, vec![(names::SIZE, ParamValue::vector(*half))])
}

fn deformable_cube(half: &Vec3) -> Conversion {
    let params = names::MIN_MAX
        .iter()
        .enumerate()
        .flat_map(|(axis, (min, max))| {
            let h = ParamValue::Float(half[axis]);
            [(*min, h), (*max, h)]
        })
        .collect();
    Conversion::new(ShapeType::DeformableCube, params)
}

fn grid(half: &Vec3) -> Conversion {
    Conversion::new(
        ShapeType::Grid,
        vec![
            (names::SIZE_X, ParamValue::Float(half.x)),
            (names::SIZE_Y, ParamValue::Float(half.y)),
        ],
    )
}

/// Radii of the upper and lower halves, measured from the box's vertical axis.
fn cone(bbox: &BoundingBox, verts: &[Point3]) -> Conversion {
    let center = bbox.center();
    let mut top = MIN_RADIUS;
    let mut bottom = MIN_RADIUS;
    for v in verts {
        let r = (v.x - center.x).hypot(v.y - center.y);
        if v.z >= center.z {
            top = top.max(r);
        } else {
            bottom = bottom.max(r);
        }
    }
    let height = bbox.size().z.max(MIN_SIZE);
    Conversion::new(
        ShapeType::Cone,
        vec![
            (names::TOP_RADIUS, ParamValue::Float(top)),
            (names::BOTTOM_RADIUS, ParamValue::Float(bottom)),
            (names::HEIGHT, ParamValue::Float(height)),
        ],
    )
    .with_offset(Vec3::new(0.0, 0.0, -height / 2.0))
}

fn cylinder(size: &Vec3) -> Conversion {
    let height = size.z.max(MIN_SIZE);
    Conversion::new(
        ShapeType::Cylinder,
        vec![
            (names::RADIUS, ParamValue::Float(xy_radius(size))),
            (names::HEIGHT, ParamValue::Float(height)),
        ],
    )
    .with_offset(Vec3::new(0.0, 0.0, -height / 2.0))
}

fn tube(size: &Vec3) -> Conversion {
    let outer = xy_radius(size);
    let height = size.z.max(MIN_SIZE);
    Conversion::new(
        ShapeType::Tube,
        vec![
            (names::OUTER_RADIUS, ParamValue::Float(outer)),
            (names::INNER_RADIUS, ParamValue::Float(outer / 2.0)),
            (names::HEIGHT, ParamValue::Float(height)),
        ],
    )
    .with_offset(Vec3::new(0.0, 0.0, -height / 2.0))
}

/// `Height` is half the straight section between the caps.
fn capsule(size: &Vec3) -> Conversion {
    let radius = xy_radius(size);
    let height = (size.z / 2.0 - radius).max(MIN_SIZE);
    Conversion::new(
        ShapeType::Capsule,
        vec![
            (names::RADIUS, ParamValue::Float(radius)),
            (names::HEIGHT, ParamValue::Float(height)),
        ],
    )
}

fn torus(size: &Vec3) -> Conversion {
    let ring = (size.z / 2.0).max(MIN_RADIUS);
    let radius = ((size.x + size.y) / 4.0 - ring).max(MIN_RADIUS);
    Conversion::new(
        ShapeType::Torus,
        vec![
            (names::RADIUS, ParamValue::Float(radius)),
            (names::RING_RADIUS, ParamValue::Float(ring)),
        ],
    )
}

fn sphere(shape: ShapeType, size: &Vec3) -> Conversion {
    let radius = (size.max() / 2.0).max(MIN_RADIUS);
    Conversion::new(shape, vec![(names::RADIUS, ParamValue::Float(radius))])
}

fn default_float(shape: ShapeType, name: &str) -> Result<f64, ParamError> {
    let def = shape
        .param(name)
        .ok_or_else(|| ParamError::NotFound(name.to_string()))?;
    def.default.as_float().ok_or_else(|| ParamError::TypeMismatch {
        name: name.to_string(),
        expected: primfit_params::ValueKind::Float,
        found: def.kind(),
    })
}

/// Every `Xy` length of the gear's defaults, scaled to the outer radius.
fn gear(size: &Vec3) -> Result<Conversion, ParamError> {
    let shape = ShapeType::Gear;
    let factor = xy_radius(size) / default_float(shape, names::OUTER_RADIUS)?;
    let mut params = Vec::new();
    for def in shape.params() {
        if def.scale_axis == Some(ScaleAxis::Xy) {
            params.push((def.name, def.default.scaled(def.name, factor)?));
        }
    }
    params.push((names::HEIGHT, ParamValue::Float(size.z.max(MIN_SIZE))));
    Ok(Conversion::new(shape, params))
}

/// Coil radii scaled so the outer wire surface touches the box sides; the
/// wire's own thickness is kept inside the box vertically.
fn spring(size: &Vec3) -> Result<Conversion, ParamError> {
    let shape = ShapeType::Spring;
    let top = default_float(shape, names::TOP_RADIUS)?;
    let bottom = default_float(shape, names::BOTTOM_RADIUS)?;
    let ring = default_float(shape, names::RING_RADIUS)?;
    let factor = xy_radius(size) / (top.max(bottom) + ring);

    let ring = (ring * factor).max(MIN_RADIUS);
    let height = (size.z - 2.0 * ring).max(MIN_SIZE);
    Ok(Conversion::new(
        shape,
        vec![
            (names::TOP_RADIUS, ParamValue::Float((top * factor).max(MIN_RADIUS))),
            (names::BOTTOM_RADIUS, ParamValue::Float((bottom * factor).max(MIN_RADIUS))),
            (names::RING_RADIUS, ParamValue::Float(ring)),
            (names::HEIGHT, ParamValue::Float(height)),
        ],
    )
    .with_offset(Vec3::new(0.0, 0.0, -size.z / 2.0 + ring)))
}
