//! Interfaces to the host application, plus in-memory implementations.

use std::fmt;

use primfit_math::{ObjectTransform, Point3};
use primfit_params::{MemoryStore, ParameterStore, ShapeType};

/// Severity of a user-visible report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportLevel {
    /// Informational.
    Info,
    /// Something was approximated.
    Warning,
    /// An object could not be processed.
    Error,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportLevel::Info => "INFO",
            ReportLevel::Warning => "WARNING",
            ReportLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Channel for messages shown to the end user.
pub trait ReportSink {
    /// Deliver one message.
    fn report(&mut self, level: ReportLevel, message: &str);
}

/// Collects reports in memory.
impl ReportSink for Vec<(ReportLevel, String)> {
    fn report(&mut self, level: ReportLevel, message: &str) {
        self.push((level, message.to_string()));
    }
}

/// Forwards reports to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn report(&mut self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Info => log::info!("{message}"),
            ReportLevel::Warning => log::warn!("{message}"),
            ReportLevel::Error => log::error!("{message}"),
        }
    }
}

/// Read and replace an object's location, rotation and scale.
pub trait TransformMutator {
    /// Current transform.
    fn transform(&self) -> ObjectTransform;

    /// Replace the transform.
    fn set_transform(&mut self, transform: ObjectTransform);
}

/// An object whose evaluated mesh can be read.
pub trait MeshSource: TransformMutator {
    /// Name shown in reports.
    fn name(&self) -> &str;

    /// Vertex positions of the evaluated mesh in object space (before the
    /// object transform). Potentially expensive; read once per operation.
    fn evaluated_vertices(&self) -> Vec<Point3>;
}

/// An object driven by a parametric primitive definition.
pub trait PrimitiveObject: TransformMutator {
    /// The host's parameter store type.
    type Store: ParameterStore;

    /// Name shown in reports.
    fn name(&self) -> &str;

    /// Type tag of the primitive definition, e.g. `"Cylinder"`.
    fn type_name(&self) -> &str;

    /// Live parameters of the primitive.
    fn params(&mut self) -> &mut Self::Store;
}

/// A scene object kept entirely in memory.
///
/// Serves as a mesh source (through `vertices`) and, when created with
/// [`MemoryObject::primitive`], as a primitive backed by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryObject {
    /// Object name.
    pub name: String,
    /// Type tag.
    pub type_name: String,
    /// Parameter values.
    pub store: MemoryStore,
    /// Object transform.
    pub transform: ObjectTransform,
    /// Object-space mesh vertices.
    pub vertices: Vec<Point3>,
}

impl MemoryObject {
    /// A plain mesh object.
    pub fn mesh(name: impl Into<String>, vertices: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            type_name: String::new(),
            store: MemoryStore::new(ShapeType::Cube),
            transform: ObjectTransform::identity(),
            vertices,
        }
    }

    /// A primitive with factory defaults.
    pub fn primitive(name: impl Into<String>, shape: ShapeType) -> Self {
        Self {
            name: name.into(),
            type_name: shape.name().to_string(),
            store: MemoryStore::new(shape),
            transform: ObjectTransform::identity(),
            vertices: Vec::new(),
        }
    }

    /// Replace the transform.
    pub fn with_transform(mut self, transform: ObjectTransform) -> Self {
        self.transform = transform;
        self
    }
}

impl TransformMutator for MemoryObject {
    fn transform(&self) -> ObjectTransform {
        self.transform
    }

    fn set_transform(&mut self, transform: ObjectTransform) {
        self.transform = transform;
    }
}

impl MeshSource for MemoryObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluated_vertices(&self) -> Vec<Point3> {
        self.vertices.clone()
    }
}

impl PrimitiveObject for MemoryObject {
    type Store = MemoryStore;

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn params(&mut self) -> &mut MemoryStore {
        &mut self.store
    }
}
