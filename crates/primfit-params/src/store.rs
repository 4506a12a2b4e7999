//! The external parameter store and an in-memory implementation.

use crate::shape::ShapeType;
use crate::value::ParamValue;
use crate::ParamError;

/// A named key/value store attached to a shape's procedural definition.
///
/// Hosts implement this over their own node-graph inputs. Writes are raw;
/// the free functions in [`crate::interface`] add batching and the
/// recompute notification.
pub trait ParameterStore {
    /// Current value of `name`, or `None` if the shape has no such parameter.
    fn read(&self, name: &str) -> Option<ParamValue>;

    /// Overwrite `name`.
    ///
    /// # Errors
    ///
    /// [`ParamError::NotFound`] if the parameter does not exist, or
    /// [`ParamError::TypeMismatch`] if the store enforces kinds.
    fn write(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError>;

    /// Tell the host that values changed and the shape must be recomputed.
    fn interface_update(&mut self);
}

impl<S: ParameterStore + ?Sized> ParameterStore for &mut S {
    fn read(&self, name: &str) -> Option<ParamValue> {
        (**self).read(name)
    }

    fn write(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        (**self).write(name, value)
    }

    fn interface_update(&mut self) {
        (**self).interface_update()
    }
}

/// In-memory parameter store for one shape, seeded with factory defaults.
///
/// Enforces the declared value kinds and counts recompute notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStore {
    shape: ShapeType,
    values: Vec<(&'static str, ParamValue)>,
    revision: u64,
}

impl MemoryStore {
    /// Store holding the factory defaults of `shape`.
    pub fn new(shape: ShapeType) -> Self {
        Self {
            shape,
            values: shape.params().iter().map(|p| (p.name, p.default)).collect(),
            revision: 0,
        }
    }

    /// Store with defaults overridden by `values`.
    ///
    /// Does not count as a notification.
    pub fn with_values<'a, I>(shape: ShapeType, values: I) -> Result<Self, ParamError>
    where
        I: IntoIterator<Item = (&'a str, ParamValue)>,
    {
        let mut store = Self::new(shape);
        for (name, value) in values {
            store.write(name, value)?;
        }
        Ok(store)
    }

    /// The shape this store belongs to.
    pub fn shape(&self) -> ShapeType {
        self.shape
    }

    /// Number of recompute notifications received.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All values, in table order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.values.iter().copied()
    }

    /// Float value of `name`, or `None` if missing or not a float.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.read(name).and_then(|v| v.as_float())
    }
}

impl ParameterStore for MemoryStore {
    fn read(&self, name: &str) -> Option<ParamValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    fn write(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let slot = self
            .values
            .iter_mut()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| ParamError::NotFound(name.to_string()))?;
        if slot.1.kind() != value.kind() {
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: slot.1.kind(),
                found: value.kind(),
            });
        }
        slot.1 = value;
        Ok(())
    }

    fn interface_update(&mut self) {
        self.revision += 1;
    }
}
