//! The long-lived operation context.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::f64::consts::PI;

use primfit_axis::{estimate_frame, AxisFrame};
use primfit_bounds::BoundingBox;
use primfit_convert::convert;
use primfit_math::{rotation_x, ObjectTransform, Point3, Tolerance, Vec3};
use primfit_normalize::{normalize, Compensation, NormalizeOutcome};
use primfit_params::{
    interface, names, select_tagged, BuiltinDefaults, DefaultSource, ParamMap, ParamTag,
    ParamValue, ShapeType, StagedParams,
};

use crate::error::{PrimfitError, Result};
use crate::host::{MeshSource, PrimitiveObject, ReportLevel, ReportSink};
use crate::settings::Settings;

/// Which parameter groups [`PrimfitContext::restore_defaults`] resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Reset parameters tagged `Size`.
    pub size: bool,
    /// Reset parameters tagged `Division`.
    pub division: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            size: true,
            division: true,
        }
    }
}

/// What a conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertReport {
    /// Target shape.
    pub shape: ShapeType,
    /// Frame the mesh was measured in.
    pub frame: AxisFrame,
    /// Mesh bounds in that frame.
    pub bbox: BoundingBox,
    /// Parameters written to the target.
    pub params: Vec<(&'static str, ParamValue)>,
    /// Result of folding the inherited scale, if it ran.
    pub normalized: Option<NormalizeOutcome>,
}

/// Owns settings and cached shape defaults for a session.
pub struct PrimfitContext<D: DefaultSource = BuiltinDefaults> {
    settings: Settings,
    source: D,
    defaults: BTreeMap<ShapeType, ParamMap>,
}

impl PrimfitContext<BuiltinDefaults> {
    /// Context with the given settings and built-in defaults.
    pub fn new(settings: Settings) -> Self {
        Self::with_defaults(settings, BuiltinDefaults)
    }
}

impl Default for PrimfitContext<BuiltinDefaults> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn shape_of<P: PrimitiveObject>(obj: &P) -> Result<ShapeType> {
    Ok(obj.type_name().parse::<ShapeType>()?)
}

impl<D: DefaultSource> PrimfitContext<D> {
    /// Context with a custom default-value source.
    pub fn with_defaults(settings: Settings, source: D) -> Self {
        Self {
            settings,
            source,
            defaults: BTreeMap::new(),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Source of factory defaults.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Replace the settings after validating them.
    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Fit the primitive `target` to the mesh of `source`.
    ///
    /// The target's type tag selects the shape. It is placed so that the
    /// primitive covers the source mesh, inheriting the source scale. With
    /// `convert.apply_scale` that scale is folded into the parameters (never
    /// strictly). Fitted and folded values are written in one batch, and
    /// nothing about the target changes when any step fails.
    pub fn convert_object<S, P>(
        &self,
        source: &S,
        target: &mut P,
        sink: &mut dyn ReportSink,
    ) -> Result<ConvertReport>
    where
        S: MeshSource + ?Sized,
        P: PrimitiveObject,
    {
        let shape = shape_of(target)?;
        let src = source.transform();
        let verts = source.evaluated_vertices();

        let frame = estimate_frame(&verts, &src.scale, self.settings.convert.axis_mode())?;
        let local: Vec<Point3> = verts.iter().map(|v| frame.to_frame(v)).collect();
        let bbox = BoundingBox::from_points(&local)?;
        let conversion = convert(shape, &bbox, &local)?;

        let origin = frame.from_frame(&(bbox.center() + conversion.offset));
        let mut placed = src.placed(&frame.pre_rotation, &origin);

        let mut staged = StagedParams::new(target.params());
        interface::set_many(&mut staged, conversion.params.iter().copied())?;
        let normalized = if self.settings.convert.apply_scale
            && !placed.has_unit_scale(&Tolerance::DEFAULT)
        {
            Some(normalize(shape, &placed.scale, &mut staged, false)?)
        } else {
            None
        };
        staged.commit()?;

        if let Some(outcome) = &normalized {
            fold_scale(&mut placed, outcome);
            report_warnings(sink, target.name(), outcome);
        }
        target.set_transform(placed);
        log::info!(
            "{}: converted to {shape} ({} vertices, flip {})",
            source.name(),
            verts.len(),
            frame.flip
        );

        Ok(ConvertReport {
            shape,
            frame,
            bbox,
            params: conversion.params,
            normalized,
        })
    }

    /// Convert several objects; failures are reported and skipped.
    pub fn convert_batch<'a, S, P, I>(
        &self,
        jobs: I,
        sink: &mut dyn ReportSink,
    ) -> Vec<Result<ConvertReport>>
    where
        S: MeshSource + ?Sized + 'a,
        P: PrimitiveObject + 'a,
        I: IntoIterator<Item = (&'a S, &'a mut P)>,
    {
        jobs.into_iter()
            .map(|(source, target)| {
                let result = self.convert_object(source, target, sink);
                if let Err(e) = &result {
                    report_failure(sink, source.name(), e);
                }
                result
            })
            .collect()
    }

    // =========================================================================
    // Scale normalization
    // =========================================================================

    /// Fold the object's scale into its parameters and reset the scale.
    ///
    /// Strictness follows `normalize.strict`. Warnings go to `sink`.
    pub fn normalize_object<P: PrimitiveObject>(
        &self,
        obj: &mut P,
        sink: &mut dyn ReportSink,
    ) -> Result<NormalizeOutcome> {
        self.normalize_with(obj, self.settings.normalize.strict, sink)
    }

    /// Normalize several objects; failures are reported and skipped.
    pub fn normalize_batch<'a, P, I>(
        &self,
        objects: I,
        sink: &mut dyn ReportSink,
    ) -> Vec<Result<NormalizeOutcome>>
    where
        P: PrimitiveObject + 'a,
        I: IntoIterator<Item = &'a mut P>,
    {
        objects
            .into_iter()
            .map(|obj| {
                let result = self.normalize_object(obj, sink);
                if let Err(e) = &result {
                    report_failure(sink, obj.name(), e);
                }
                result
            })
            .collect()
    }

    fn normalize_with<P: PrimitiveObject>(
        &self,
        obj: &mut P,
        strict: bool,
        sink: &mut dyn ReportSink,
    ) -> Result<NormalizeOutcome> {
        let shape = shape_of(obj)?;
        let mut transform = obj.transform();
        let outcome = normalize(shape, &transform.scale, obj.params(), strict)?;

        fold_scale(&mut transform, &outcome);
        obj.set_transform(transform);
        report_warnings(sink, obj.name(), &outcome);
        log::info!("{}: applied scale to {shape}", obj.name());
        Ok(outcome)
    }

    // =========================================================================
    // Defaults and utilities
    // =========================================================================

    /// Factory defaults of `shape`, loaded once per context.
    pub fn defaults_for(&mut self, shape: ShapeType) -> Result<&ParamMap> {
        match self.defaults.entry(shape) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let map = self.source.load(shape)?;
                log::debug!("loaded {} default(s) for {shape}", map.len());
                Ok(slot.insert(map))
            }
        }
    }

    /// Reset the selected parameter groups to their factory values.
    ///
    /// Returns the number of parameters written.
    pub fn restore_defaults<P: PrimitiveObject>(
        &mut self,
        obj: &mut P,
        options: RestoreOptions,
    ) -> Result<usize> {
        let shape = shape_of(obj)?;
        let mut tags = Vec::new();
        if options.size {
            tags.push(ParamTag::Size);
        }
        if options.division {
            tags.push(ParamTag::Division);
        }
        let values = select_tagged(shape, self.defaults_for(shape)?, &tags);
        if values.is_empty() {
            return Ok(0);
        }
        Ok(interface::set_many(obj.params(), values)?)
    }

    /// Move a deformable cube's origin to the centre of its extent.
    ///
    /// Each axis gets equal `Min` and `Max`, and the object moves so the
    /// geometry stays where it was.
    pub fn center_deformable_cube<P: PrimitiveObject>(&self, obj: &mut P) -> Result<Vec3> {
        let shape = shape_of(obj)?;
        if shape != ShapeType::DeformableCube {
            return Err(PrimfitError::WrongType {
                operation: "center_deformable_cube",
                expected: ShapeType::DeformableCube.name(),
                found: shape.name().to_string(),
            });
        }

        let mut shift = Vec3::zeros();
        let mut values = Vec::with_capacity(6);
        for (axis, (min, max)) in names::MIN_MAX.iter().enumerate() {
            let lo = interface::get_float(obj.params(), min)?;
            let hi = interface::get_float(obj.params(), max)?;
            let mid = (lo + hi) / 2.0;
            shift[axis] = (hi - lo) / 2.0;
            values.push((*min, ParamValue::Float(mid)));
            values.push((*max, ParamValue::Float(mid)));
        }
        interface::set_many(obj.params(), values)?;

        let mut transform = obj.transform();
        let offset = transform.apply_vec(&shift);
        transform.location += offset;
        obj.set_transform(transform);
        Ok(offset)
    }
}

/// Reset the scale the parameters now carry and apply the compensation.
fn fold_scale(transform: &mut ObjectTransform, outcome: &NormalizeOutcome) {
    if outcome.compensation == Compensation::RotateX180 {
        transform.rotation *= rotation_x(PI);
    }
    transform.scale = Vec3::new(1.0, 1.0, 1.0);
}

fn report_warnings(sink: &mut dyn ReportSink, name: &str, outcome: &NormalizeOutcome) {
    for warning in &outcome.warnings {
        let message = format!("{name}: {warning}");
        log::warn!("{message}");
        sink.report(ReportLevel::Warning, &message);
    }
}

fn report_failure(sink: &mut dyn ReportSink, name: &str, err: &PrimfitError) {
    let message = format!("{name}: {err}");
    log::error!("{message}");
    sink.report(ReportLevel::Error, &message);
}
