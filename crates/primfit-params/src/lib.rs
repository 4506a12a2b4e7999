#![warn(missing_docs)]

//! Parametric shape types and the named parameters behind them.
//!
//! Every [`ShapeType`] owns a static, ordered table of [`ParamDef`]s. Hosts
//! expose a shape's live values through the [`ParameterStore`] trait; the
//! functions in [`interface`] add existence checks and batch notification on
//! top of it, and [`StagedParams`] buffers writes so that a failed operation
//! leaves the store untouched.

pub mod defaults;
pub mod error;
pub mod interface;
pub mod shape;
pub mod staged;
pub mod store;
pub mod value;

pub use defaults::{defaults, select_tagged, BuiltinDefaults, DefaultSource, ParamMap};
pub use error::ParamError;
pub use shape::{names, ParamDef, ParamTag, ScaleAxis, ShapeType};
pub use staged::StagedParams;
pub use store::{MemoryStore, ParameterStore};
pub use value::{ParamValue, ValueKind};
