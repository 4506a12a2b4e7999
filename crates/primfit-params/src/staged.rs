//! Buffered writes committed in one batch.

use crate::interface;
use crate::store::ParameterStore;
use crate::value::ParamValue;
use crate::ParamError;

/// A write buffer over a [`ParameterStore`].
///
/// Reads see pending writes. Nothing reaches the underlying store until
/// [`commit`](Self::commit); dropping the buffer discards every pending write.
pub struct StagedParams<'a, S: ParameterStore + ?Sized> {
    store: &'a mut S,
    pending: Vec<(String, ParamValue)>,
}

impl<'a, S: ParameterStore + ?Sized> StagedParams<'a, S> {
    /// Start staging writes against `store`.
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Pending writes, in first-write order.
    pub fn pending(&self) -> &[(String, ParamValue)] {
        &self.pending
    }

    /// Whether any write is pending.
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Flush pending writes through [`interface::set_many`].
    ///
    /// Returns the number of values written. An empty buffer writes nothing
    /// and does not notify the host.
    pub fn commit(self) -> Result<usize, ParamError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        interface::set_many(self.store, self.pending)
    }
}

impl<S: ParameterStore + ?Sized> ParameterStore for StagedParams<'_, S> {
    fn read(&self, name: &str) -> Option<ParamValue> {
        self.pending
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .or_else(|| self.store.read(name))
    }

    fn write(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let current = self
            .store
            .read(name)
            .ok_or_else(|| ParamError::NotFound(name.to_string()))?;
        if current.kind() != value.kind() {
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: current.kind(),
                found: value.kind(),
            });
        }
        match self.pending.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.pending.push((name.to_string(), value)),
        }
        Ok(())
    }

    fn interface_update(&mut self) {}
}
