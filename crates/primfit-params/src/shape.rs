//! Shape types and their declarative parameter tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::{ParamValue, ValueKind};
use crate::ParamError;

/// Parameter names shared between converters, normalizers and hosts.
pub mod names {
    #![allow(missing_docs)]

    pub const SIZE: &str = "Size";
    pub const SIZE_X: &str = "Size X";
    pub const SIZE_Y: &str = "Size Y";
    pub const MIN_X: &str = "Min X";
    pub const MAX_X: &str = "Max X";
    pub const MIN_Y: &str = "Min Y";
    pub const MAX_Y: &str = "Max Y";
    pub const MIN_Z: &str = "Min Z";
    pub const MAX_Z: &str = "Max Z";
    pub const HEIGHT: &str = "Height";
    pub const RADIUS: &str = "Radius";
    pub const TOP_RADIUS: &str = "Top Radius";
    pub const BOTTOM_RADIUS: &str = "Bottom Radius";
    pub const RING_RADIUS: &str = "Ring Radius";
    pub const OUTER_RADIUS: &str = "Outer Radius";
    pub const INNER_RADIUS: &str = "Inner Radius";
    pub const INNER_CIRCLE_RADIUS: &str = "InnerCircle Radius";
    pub const INNER_CIRCLE_DIVISION: &str = "InnerCircle Division";
    pub const FILLET_RADIUS: &str = "Fillet Radius";
    pub const FILLET_COUNT: &str = "Fillet Count";
    pub const NUM_BLADES: &str = "Num Blades";
    pub const TWIST: &str = "Twist";
    pub const ROTATIONS: &str = "Rotations";
    pub const DIVISION_X: &str = "Division X";
    pub const DIVISION_Y: &str = "Division Y";
    pub const DIVISION_Z: &str = "Division Z";
    pub const GLOBAL_DIVISION: &str = "Global Division";
    pub const DIV_CIRCLE: &str = "Div Circle";
    pub const DIV_SIDE: &str = "Div Side";
    pub const DIV_FILL: &str = "Div Fill";
    pub const DIV_RING: &str = "Div Ring";
    pub const DIV_CAP: &str = "Div Cap";
    pub const SUBDIVISION: &str = "Subdivision";
    pub const SMOOTH: &str = "Smooth";
    pub const SMOOTH_ANGLE: &str = "Smooth Angle";

    /// `(min, max)` parameter names of a deformable cube axis (0 = X).
    pub const MIN_MAX: [(&str, &str); 3] = [(MIN_X, MAX_X), (MIN_Y, MAX_Y), (MIN_Z, MAX_Z)];
}

use names::*;

/// The closed set of parametric shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeType {
    /// Box with half-extent vector.
    Cube,
    /// Cone or frustum along Z, origin at the base.
    Cone,
    /// Flat grid in the XY plane.
    Grid,
    /// Torus around Z.
    Torus,
    /// Cylinder along Z, origin at the base.
    Cylinder,
    /// Latitude/longitude sphere.
    UVSphere,
    /// Subdivided icosahedron sphere.
    ICOSphere,
    /// Hollow cylinder along Z, origin at the base.
    Tube,
    /// Extruded gear along Z.
    Gear,
    /// Helical spring along Z.
    Spring,
    /// Box with independent min/max extents per axis.
    DeformableCube,
    /// Capsule along Z.
    Capsule,
    /// Subdivided cube projected onto a sphere.
    QuadSphere,
}

impl ShapeType {
    /// Every shape type, in declaration order.
    pub const ALL: [ShapeType; 13] = [
        ShapeType::Cube,
        ShapeType::Cone,
        ShapeType::Grid,
        ShapeType::Torus,
        ShapeType::Cylinder,
        ShapeType::UVSphere,
        ShapeType::ICOSphere,
        ShapeType::Tube,
        ShapeType::Gear,
        ShapeType::Spring,
        ShapeType::DeformableCube,
        ShapeType::Capsule,
        ShapeType::QuadSphere,
    ];

    /// Canonical name, as used by hosts to tag shape definitions.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Cube => "Cube",
            ShapeType::Cone => "Cone",
            ShapeType::Grid => "Grid",
            ShapeType::Torus => "Torus",
            ShapeType::Cylinder => "Cylinder",
            ShapeType::UVSphere => "UVSphere",
            ShapeType::ICOSphere => "ICOSphere",
            ShapeType::Tube => "Tube",
            ShapeType::Gear => "Gear",
            ShapeType::Spring => "Spring",
            ShapeType::DeformableCube => "DeformableCube",
            ShapeType::Capsule => "Capsule",
            ShapeType::QuadSphere => "QuadSphere",
        }
    }

    /// The ordered parameter table of this shape.
    pub fn params(&self) -> &'static [ParamDef] {
        match self {
            ShapeType::Cube => CUBE,
            ShapeType::Cone => CONE,
            ShapeType::Grid => GRID,
            ShapeType::Torus => TORUS,
            ShapeType::Cylinder => CYLINDER,
            ShapeType::UVSphere => UV_SPHERE,
            ShapeType::ICOSphere => ICO_SPHERE,
            ShapeType::Tube => TUBE,
            ShapeType::Gear => GEAR,
            ShapeType::Spring => SPRING,
            ShapeType::DeformableCube => DEFORMABLE_CUBE,
            ShapeType::Capsule => CAPSULE,
            ShapeType::QuadSphere => QUAD_SPHERE,
        }
    }

    /// Look up a parameter definition by name.
    pub fn param(&self, name: &str) -> Option<&'static ParamDef> {
        self.params().iter().find(|p| p.name == name)
    }

    /// Names of every parameter, in table order.
    pub fn param_names(&self) -> impl Iterator<Item = &'static str> {
        self.params().iter().map(|p| p.name)
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ParamError::UnknownType(s.to_string()))
    }
}

/// Semantic tags driving bulk operations (reset, scale folding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamTag {
    /// A length or extent.
    Size,
    /// A tessellation density.
    Division,
    /// An extent across the cross-section.
    Width,
    /// An extent along the height axis.
    Height,
    /// Shading toggles.
    Smooth,
    /// Anything else (counts, angles).
    Other,
}

/// Which scale factor applies to a parameter when folding object scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleAxis {
    /// Object X scale.
    X,
    /// Object Y scale.
    Y,
    /// Object Z scale.
    Z,
    /// Cross-section scale (mean of X and Y).
    Xy,
    /// Overall scale (mean of X, Y and Z).
    Xyz,
    /// Vector parameter whose components follow X, Y and Z.
    PerAxis,
}

/// Declaration of one named shape parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDef {
    /// Name in the host's parameter store.
    pub name: &'static str,
    /// Semantic tags.
    pub tags: &'static [ParamTag],
    /// Scale factor used by scale folding, if the parameter carries a size.
    pub scale_axis: Option<ScaleAxis>,
    /// Factory default value.
    pub default: ParamValue,
}

impl ParamDef {
    /// The value kind, taken from the default.
    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    /// Whether this parameter carries `tag`.
    pub fn has_tag(&self, tag: ParamTag) -> bool {
        self.tags.contains(&tag)
    }
}

const fn length(
    name: &'static str,
    tags: &'static [ParamTag],
    axis: ScaleAxis,
    default: f64,
) -> ParamDef {
    ParamDef {
        name,
        tags,
        scale_axis: Some(axis),
        default: ParamValue::Float(default),
    }
}

const fn division(name: &'static str, default: i64) -> ParamDef {
    ParamDef {
        name,
        tags: &[ParamTag::Division],
        scale_axis: None,
        default: ParamValue::Int(default),
    }
}

const fn other(name: &'static str, default: ParamValue) -> ParamDef {
    ParamDef {
        name,
        tags: &[ParamTag::Other],
        scale_axis: None,
        default,
    }
}

const SMOOTH_FLAG: ParamDef = ParamDef {
    name: SMOOTH,
    tags: &[ParamTag::Smooth],
    scale_axis: None,
    default: ParamValue::Bool(true),
};

const SMOOTH_ANGLE_DEG: ParamDef = ParamDef {
    name: SMOOTH_ANGLE,
    tags: &[ParamTag::Smooth],
    scale_axis: None,
    default: ParamValue::Float(30.0),
};

const SIZE_TAGS: &[ParamTag] = &[ParamTag::Size];
const WIDTH_TAGS: &[ParamTag] = &[ParamTag::Size, ParamTag::Width];
const HEIGHT_TAGS: &[ParamTag] = &[ParamTag::Size, ParamTag::Height];

static CUBE: &[ParamDef] = &[
    ParamDef {
        name: SIZE,
        tags: SIZE_TAGS,
        scale_axis: Some(ScaleAxis::PerAxis),
        default: ParamValue::Vector([1.0, 1.0, 1.0]),
    },
    division(DIVISION_X, 1),
    division(DIVISION_Y, 1),
    division(DIVISION_Z, 1),
    division(GLOBAL_DIVISION, 1),
    SMOOTH_FLAG,
];

static DEFORMABLE_CUBE: &[ParamDef] = &[
    length(MIN_X, WIDTH_TAGS, ScaleAxis::X, 1.0),
    length(MAX_X, WIDTH_TAGS, ScaleAxis::X, 1.0),
    length(MIN_Y, WIDTH_TAGS, ScaleAxis::Y, 1.0),
    length(MAX_Y, WIDTH_TAGS, ScaleAxis::Y, 1.0),
    length(MIN_Z, HEIGHT_TAGS, ScaleAxis::Z, 1.0),
    length(MAX_Z, HEIGHT_TAGS, ScaleAxis::Z, 1.0),
    division(DIVISION_X, 1),
    division(DIVISION_Y, 1),
    division(DIVISION_Z, 1),
];

static GRID: &[ParamDef] = &[
    length(SIZE_X, WIDTH_TAGS, ScaleAxis::X, 1.0),
    length(SIZE_Y, WIDTH_TAGS, ScaleAxis::Y, 1.0),
    division(DIVISION_X, 10),
    division(DIVISION_Y, 10),
];

static CONE: &[ParamDef] = &[
    length(TOP_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 0.0),
    length(BOTTOM_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 1.0),
    length(HEIGHT, HEIGHT_TAGS, ScaleAxis::Z, 2.0),
    division(DIV_CIRCLE, 32),
    division(DIV_SIDE, 1),
    division(DIV_FILL, 1),
    SMOOTH_FLAG,
    SMOOTH_ANGLE_DEG,
];

static CYLINDER: &[ParamDef] = &[
    length(RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 1.0),
    length(HEIGHT, HEIGHT_TAGS, ScaleAxis::Z, 2.0),
    division(DIV_CIRCLE, 32),
    division(DIV_SIDE, 1),
    division(DIV_FILL, 1),
    SMOOTH_FLAG,
    SMOOTH_ANGLE_DEG,
];

static TUBE: &[ParamDef] = &[
    length(OUTER_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 1.0),
    length(INNER_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 0.5),
    length(HEIGHT, HEIGHT_TAGS, ScaleAxis::Z, 2.0),
    division(DIV_CIRCLE, 32),
    division(DIV_SIDE, 1),
    SMOOTH_FLAG,
];

static CAPSULE: &[ParamDef] = &[
    length(RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 0.5),
    length(HEIGHT, HEIGHT_TAGS, ScaleAxis::Z, 0.5),
    division(DIV_CIRCLE, 32),
    division(DIV_SIDE, 1),
    division(DIV_CAP, 8),
    SMOOTH_FLAG,
];

static TORUS: &[ParamDef] = &[
    length(RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 1.0),
    length(RING_RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 0.25),
    division(DIV_CIRCLE, 48),
    division(DIV_RING, 12),
    SMOOTH_FLAG,
];

static UV_SPHERE: &[ParamDef] = &[
    length(RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 1.0),
    division(DIV_CIRCLE, 32),
    division(DIV_RING, 16),
    SMOOTH_FLAG,
];

static ICO_SPHERE: &[ParamDef] = &[
    length(RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 1.0),
    division(SUBDIVISION, 2),
    SMOOTH_FLAG,
];

static QUAD_SPHERE: &[ParamDef] = &[
    length(RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 1.0),
    division(SUBDIVISION, 3),
    SMOOTH_FLAG,
];

static GEAR: &[ParamDef] = &[
    other(NUM_BLADES, ParamValue::Int(12)),
    length(INNER_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 0.8),
    length(OUTER_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 1.0),
    other(TWIST, ParamValue::Float(0.0)),
    division(INNER_CIRCLE_DIVISION, 16),
    length(INNER_CIRCLE_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 0.2),
    other(FILLET_COUNT, ParamValue::Int(1)),
    length(FILLET_RADIUS, WIDTH_TAGS, ScaleAxis::Xy, 0.01),
    length(HEIGHT, HEIGHT_TAGS, ScaleAxis::Z, 0.2),
];

static SPRING: &[ParamDef] = &[
    length(TOP_RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 1.0),
    length(BOTTOM_RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 1.0),
    length(RING_RADIUS, SIZE_TAGS, ScaleAxis::Xyz, 0.1),
    length(HEIGHT, HEIGHT_TAGS, ScaleAxis::Xyz, 2.0),
    other(ROTATIONS, ParamValue::Float(4.0)),
    division(DIV_CIRCLE, 64),
    division(DIV_RING, 12),
    SMOOTH_FLAG,
];
