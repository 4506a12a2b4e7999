//! Factory default values per shape.

use std::collections::BTreeMap;

use crate::shape::{ParamTag, ShapeType};
use crate::value::ParamValue;
use crate::ParamError;

/// Parameter values keyed by name.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Something that can produce the factory defaults of a shape.
///
/// Hosts that ship their own node-graph assets can read defaults from there;
/// [`BuiltinDefaults`] uses the static parameter tables.
pub trait DefaultSource {
    /// Every default value of `shape`.
    fn load(&self, shape: ShapeType) -> Result<ParamMap, ParamError>;
}

/// Defaults taken from the parameter tables compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDefaults;

impl DefaultSource for BuiltinDefaults {
    fn load(&self, shape: ShapeType) -> Result<ParamMap, ParamError> {
        Ok(defaults(shape))
    }
}

/// The built-in defaults of `shape`.
pub fn defaults(shape: ShapeType) -> ParamMap {
    shape
        .params()
        .iter()
        .map(|p| (p.name.to_string(), p.default))
        .collect()
}

/// Defaults of the parameters of `shape` carrying any of `tags`, in table order.
///
/// Parameters missing from `map` are skipped.
pub fn select_tagged(
    shape: ShapeType,
    map: &ParamMap,
    tags: &[ParamTag],
) -> Vec<(&'static str, ParamValue)> {
    shape
        .params()
        .iter()
        .filter(|p| tags.iter().any(|t| p.has_tag(*t)))
        .filter_map(|p| map.get(p.name).map(|v| (p.name, *v)))
        .collect()
}
