//! Generic named get/set/swap/modify over any [`ParameterStore`].
//!
//! Every mutating call ends with exactly one
//! [`interface_update`](ParameterStore::interface_update), and checks that
//! all names exist before the first write.

use std::collections::BTreeMap;

use crate::store::ParameterStore;
use crate::value::ParamValue;
use crate::ParamError;

/// Read one parameter.
///
/// # Errors
///
/// [`ParamError::NotFound`] if `name` is not part of the shape.
pub fn get<S: ParameterStore + ?Sized>(store: &S, name: &str) -> Result<ParamValue, ParamError> {
    store
        .read(name)
        .ok_or_else(|| ParamError::NotFound(name.to_string()))
}

/// Read one float parameter.
pub fn get_float<S: ParameterStore + ?Sized>(store: &S, name: &str) -> Result<f64, ParamError> {
    let value = get(store, name)?;
    value.as_float().ok_or_else(|| ParamError::TypeMismatch {
        name: name.to_string(),
        expected: crate::ValueKind::Float,
        found: value.kind(),
    })
}

/// Write one parameter and notify.
pub fn set<S: ParameterStore + ?Sized>(
    store: &mut S,
    name: &str,
    value: ParamValue,
) -> Result<(), ParamError> {
    get(store, name)?;
    store.write(name, value)?;
    store.interface_update();
    Ok(())
}

/// Read several parameters at once.
pub fn get_many<'a, S, I>(store: &S, names: I) -> Result<BTreeMap<String, ParamValue>, ParamError>
where
    S: ParameterStore + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| get(store, name).map(|v| (name.to_string(), v)))
        .collect()
}

/// Write several parameters, then notify once.
///
/// Returns the number of values written.
pub fn set_many<S, N, I>(store: &mut S, values: I) -> Result<usize, ParamError>
where
    S: ParameterStore + ?Sized,
    N: AsRef<str>,
    I: IntoIterator<Item = (N, ParamValue)>,
{
    let values: Vec<(N, ParamValue)> = values.into_iter().collect();
    for (name, _) in &values {
        get(store, name.as_ref())?;
    }
    for (name, value) in &values {
        store.write(name.as_ref(), *value)?;
    }
    store.interface_update();
    Ok(values.len())
}

/// Read-modify-write one parameter.
pub fn modify<S, F>(store: &mut S, name: &str, f: F) -> Result<ParamValue, ParamError>
where
    S: ParameterStore + ?Sized,
    F: FnOnce(ParamValue) -> Result<ParamValue, ParamError>,
{
    let new_value = f(get(store, name)?)?;
    store.write(name, new_value)?;
    store.interface_update();
    Ok(new_value)
}

/// Exchange the values of two parameters.
pub fn swap<S: ParameterStore + ?Sized>(store: &mut S, a: &str, b: &str) -> Result<(), ParamError> {
    let va = get(store, a)?;
    let vb = get(store, b)?;
    store.write(a, vb)?;
    store.write(b, va)?;
    store.interface_update();
    Ok(())
}
