#![warn(missing_docs)]

//! primfit: turn meshes into parametric primitives and keep them clean.
//!
//! Two operations sit on top of the host application's objects:
//!
//! - **Convert**: estimate a best-fit frame for a mesh, measure it in that
//!   frame, and write the matching parameters of a Cube, Cylinder, Torus
//!   and so on into a primitive object placed over the mesh.
//! - **Apply scale**: fold an object's scale into its primitive parameters
//!   and reset the scale to one, so the shape looks the same but carries its
//!   size in parameters.
//!
//! # Example
//!
//! ```rust,no_run
//! use primfit::{MemoryObject, PrimfitContext, ReportLevel, Settings, ShapeType};
//!
//! let ctx = PrimfitContext::new(Settings::default());
//! let mesh = MemoryObject::mesh("scan", vec![/* vertices */]);
//! let mut cylinder = MemoryObject::primitive("fit", ShapeType::Cylinder);
//! let mut reports: Vec<(ReportLevel, String)> = Vec::new();
//! let report = ctx.convert_object(&mesh, &mut cylinder, &mut reports)?;
//! println!("{:?}", report.params);
//! # Ok::<(), primfit::PrimfitError>(())
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod settings;

pub use context::{ConvertReport, PrimfitContext, RestoreOptions};
pub use error::{ErrorKind, PrimfitError, Result};
pub use host::{
    LogSink, MemoryObject, MeshSource, PrimitiveObject, ReportLevel, ReportSink, TransformMutator,
};
pub use settings::{AxisChoice, ConvertSettings, NormalizeSettings, Settings};

pub use primfit_axis::{AutoAxisOptions, AxisFrame, AxisMode};
pub use primfit_bounds::BoundingBox;
pub use primfit_math::{ObjectTransform, Point3, Quat, Vec3};
pub use primfit_normalize::{Compensation, NormalizeOutcome, ScaleWarning};
pub use primfit_params::{
    names, BuiltinDefaults, DefaultSource, MemoryStore, ParamMap, ParamValue, ParameterStore,
    ShapeType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use primfit_math::{rotation_x, rotation_y, rotation_z};
    use primfit_params::ParamError;
    use std::cell::Cell;
    use std::f64::consts::PI;

    fn box_mesh(sx: f64, sy: f64, sz: f64) -> Vec<Point3> {
        let mut pts = Vec::new();
        for &x in &[-sx / 2.0, sx / 2.0] {
            for &y in &[-sy / 2.0, sy / 2.0] {
                for &z in &[-sz / 2.0, sz / 2.0] {
                    pts.push(Point3::new(x, y, z));
                }
            }
        }
        pts
    }

    fn box_corners(min: Vec3, max: Vec3) -> Vec<Point3> {
        box_mesh(1.0, 1.0, 1.0)
            .iter()
            .map(|p| {
                Point3::new(
                    if p.x < 0.0 { min.x } else { max.x },
                    if p.y < 0.0 { min.y } else { max.y },
                    if p.z < 0.0 { min.z } else { max.z },
                )
            })
            .collect()
    }

    fn assert_same_points(a: &[Point3], b: &[Point3]) {
        assert_eq!(a.len(), b.len());
        for p in a {
            assert!(b.iter().any(|q| (p - q).norm() < 1e-9), "{p} not matched");
        }
    }

    fn float(obj: &MemoryObject, name: &str) -> f64 {
        obj.store.float(name).unwrap()
    }

    fn strict_off() -> Settings {
        let mut s = Settings::default();
        s.normalize.strict = false;
        s
    }

    #[test]
    fn test_convert_cube_covers_mesh() {
        let src_t = ObjectTransform::translation(3.0, -1.0, 2.0)
            .with_rotation(rotation_z(0.4) * rotation_y(0.3))
            .with_scale(2.0, 2.0, 2.0);
        let mesh = MemoryObject::mesh("box", box_mesh(2.0, 4.0, 6.0)).with_transform(src_t);
        let mut cube = MemoryObject::primitive("cube", ShapeType::Cube);
        let mut reports: Vec<(ReportLevel, String)> = Vec::new();

        let ctx = PrimfitContext::default();
        let report = ctx.convert_object(&mesh, &mut cube, &mut reports).unwrap();
        assert_eq!(report.shape, ShapeType::Cube);
        assert!(report.normalized.is_some());
        assert!(reports.is_empty());
        assert!(cube.transform.has_unit_scale(&primfit_math::Tolerance::DEFAULT));
        assert_eq!(cube.store.revision(), 1);

        let size = cube.store.read(names::SIZE).and_then(|v| v.as_vec3()).unwrap();
        let mut sorted = [size.x, size.y, size.z];
        sorted.sort_by(f64::total_cmp);
        assert_abs_diff_eq!(sorted[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sorted[1], 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sorted[2], 6.0, epsilon = 1e-9);

        let before: Vec<Point3> = mesh.vertices.iter().map(|p| src_t.apply_point(p)).collect();
        let after: Vec<Point3> = box_corners(-size, size)
            .iter()
            .map(|p| cube.transform.apply_point(p))
            .collect();
        assert_same_points(&before, &after);
    }

    #[test]
    fn test_convert_cube_forced_axis_round_trip() {
        let mut settings = Settings::default();
        settings.convert.axis = AxisChoice::Z;
        let ctx = PrimfitContext::new(settings);
        let mesh = MemoryObject::mesh("box", box_mesh(2.0, 4.0, 6.0));
        let mut cube = MemoryObject::primitive("cube", ShapeType::Cube);
        let report = ctx.convert_object(&mesh, &mut cube, &mut LogSink).unwrap();
        assert_eq!(cube.store.read(names::SIZE), Some(ParamValue::Vector([1.0, 2.0, 3.0])));
        assert_eq!(report.params, vec![(names::SIZE, ParamValue::Vector([1.0, 2.0, 3.0]))]);
        assert_eq!(cube.transform, ObjectTransform::identity());
        assert!(report.normalized.is_none());
    }

    #[test]
    fn test_convert_cube_auto_round_trip() {
        // The narrow X extent becomes the frame's Y axis.
        let ctx = PrimfitContext::default();
        let mesh = MemoryObject::mesh("box", box_mesh(2.0, 4.0, 6.0));
        let mut cube = MemoryObject::primitive("cube", ShapeType::Cube);
        let report = ctx.convert_object(&mesh, &mut cube, &mut LogSink).unwrap();
        let size = cube.store.read(names::SIZE).and_then(|v| v.as_vec3()).unwrap();
        assert!((size - Vec3::new(2.0, 1.0, 3.0)).norm() < 1e-9);
        assert!(report.frame.axes()[1].x.abs() > 1.0 - 1e-9);
        assert!(cube.transform.location.norm() < 1e-9);
    }

    #[test]
    fn test_convert_cylinder_along_x() {
        let mut settings = Settings::default();
        settings.convert.axis = AxisChoice::X;
        let ctx = PrimfitContext::new(settings);

        let mut verts = Vec::new();
        for k in 0..16 {
            let a = k as f64 * PI / 8.0;
            for x in [-2.0, 2.0] {
                verts.push(Point3::new(x, a.cos(), a.sin()));
            }
        }
        let src_t = ObjectTransform::translation(0.0, 0.0, 5.0).with_rotation(rotation_z(PI / 2.0));
        let mesh = MemoryObject::mesh("rod", verts).with_transform(src_t);
        let mut cyl = MemoryObject::primitive("cyl", ShapeType::Cylinder);
        ctx.convert_object(&mesh, &mut cyl, &mut LogSink).unwrap();

        assert_abs_diff_eq!(float(&cyl, names::RADIUS), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(float(&cyl, names::HEIGHT), 4.0, epsilon = 1e-12);
        // Base of the cylinder sits at the mesh's -X end.
        let base = src_t.apply_point(&Point3::new(-2.0, 0.0, 0.0));
        assert!((cyl.transform.location - base.coords).norm() < 1e-12);
        let height_dir = cyl.transform.rotation * Vec3::z();
        assert!((height_dir - src_t.rotation * Vec3::x()).norm() < 1e-12);
    }

    #[test]
    fn test_convert_keeps_scale_when_asked() {
        let mut settings = Settings::default();
        settings.convert.axis = AxisChoice::Z;
        settings.convert.apply_scale = false;
        let ctx = PrimfitContext::new(settings);
        let mesh = MemoryObject::mesh("box", box_mesh(2.0, 2.0, 2.0))
            .with_transform(ObjectTransform::identity().with_scale(1.0, 2.0, 3.0));
        let mut cube = MemoryObject::primitive("cube", ShapeType::Cube);
        let report = ctx.convert_object(&mesh, &mut cube, &mut LogSink).unwrap();
        assert!(report.normalized.is_none());
        assert_eq!(cube.transform.scale, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_convert_errors() {
        let ctx = PrimfitContext::default();
        let mut cube = MemoryObject::primitive("cube", ShapeType::Cube);

        let dot = MemoryObject::mesh("dot", vec![Point3::origin()]);
        let err = ctx.convert_object(&dot, &mut cube, &mut LogSink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);

        let stretched = MemoryObject::mesh("stretched", box_mesh(1.0, 2.0, 3.0))
            .with_transform(ObjectTransform::identity().with_scale(1.0, 1.0, 2.0));
        let err = ctx.convert_object(&stretched, &mut cube, &mut LogSink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonUniformScale);
        assert_eq!(cube.store.revision(), 0);
    }

    #[test]
    fn test_convert_failed_fold_leaves_target() {
        let ctx = PrimfitContext::default();
        let mut verts = Vec::new();
        for k in 0..12 {
            let a = k as f64 * PI / 6.0;
            for z in [0.0, 6.0] {
                verts.push(Point3::new(2.0 * a.cos(), a.sin(), z));
            }
        }
        let mirrored = ObjectTransform::translation(1.0, 2.0, 3.0).with_scale(-1.0, -1.0, -1.0);
        let mesh = MemoryObject::mesh("coil", verts).with_transform(mirrored);
        let mut spring = MemoryObject::primitive("spring", ShapeType::Spring);
        let mut reports: Vec<(ReportLevel, String)> = Vec::new();

        let results = ctx.convert_batch([(&mesh, &mut spring)], &mut reports);
        assert_eq!(results[0].as_ref().unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].1.starts_with("coil: "));
        assert_eq!(spring.store, MemoryStore::new(ShapeType::Spring));
        assert_eq!(spring.store.revision(), 0);
        assert_eq!(spring.transform, ObjectTransform::identity());
    }

    #[test]
    fn test_normalize_cylinder() {
        let ctx = PrimfitContext::default();
        let mut cyl = MemoryObject::primitive("cyl", ShapeType::Cylinder)
            .with_transform(ObjectTransform::translation(1.0, 1.0, 1.0).with_scale(2.0, 2.0, 3.0));
        let mut reports: Vec<(ReportLevel, String)> = Vec::new();
        let out = ctx.normalize_object(&mut cyl, &mut reports).unwrap();
        assert!(out.warnings.is_empty());
        assert_abs_diff_eq!(float(&cyl, names::RADIUS), 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(float(&cyl, names::HEIGHT), 6.0, epsilon = 1e-12);
        assert_eq!(cyl.transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(cyl.transform.location, Vec3::new(1.0, 1.0, 1.0));
        assert!(reports.is_empty());
    }

    #[test]
    fn test_normalize_negative_z_compensates() {
        let ctx = PrimfitContext::default();
        let rot = rotation_x(0.3);
        let t = ObjectTransform::identity().with_rotation(rot).with_scale(1.0, 1.0, -1.0);
        let mut cyl = MemoryObject::primitive("cyl", ShapeType::Cylinder).with_transform(t);
        let out = ctx.normalize_object(&mut cyl, &mut LogSink).unwrap();
        assert_eq!(out.compensation, Compensation::RotateX180);
        assert_abs_diff_eq!(float(&cyl, names::HEIGHT), 2.0);
        let expected = rot * rotation_x(PI);
        assert!(cyl.transform.rotation.angle_to(&expected) < 1e-12);
    }

    #[test]
    fn test_strict_failure_leaves_object() {
        let ctx = PrimfitContext::default();
        let t = ObjectTransform::identity().with_scale(1.0, 1.0, 1.2);
        let mut sphere = MemoryObject::primitive("ball", ShapeType::UVSphere).with_transform(t);
        let err = ctx.normalize_object(&mut sphere, &mut LogSink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(float(&sphere, names::RADIUS), 1.0);
        assert_eq!(sphere.transform, t);
    }

    #[test]
    fn test_non_strict_reports_warning() {
        let ctx = PrimfitContext::new(strict_off());
        let mut sphere = MemoryObject::primitive("ball", ShapeType::UVSphere)
            .with_transform(ObjectTransform::identity().with_scale(1.0, 1.0, 1.3));
        let mut reports: Vec<(ReportLevel, String)> = Vec::new();
        let out = ctx.normalize_object(&mut sphere, &mut reports).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, ReportLevel::Warning);
        assert!(reports[0].1.starts_with("ball: object is not uniformly scaled"));
        assert_abs_diff_eq!(float(&sphere, names::RADIUS), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_batch_isolates_failures() {
        let ctx = PrimfitContext::default();
        let scaled = ObjectTransform::identity().with_scale(2.0, 2.0, 2.0);
        let mut teapot = MemoryObject::primitive("teapot", ShapeType::Cube).with_transform(scaled);
        teapot.type_name = "Teapot".into();
        let mut objects = vec![
            MemoryObject::primitive("a", ShapeType::Cylinder).with_transform(scaled),
            teapot,
            MemoryObject::primitive("b", ShapeType::Torus).with_transform(scaled),
        ];
        let mut reports: Vec<(ReportLevel, String)> = Vec::new();
        let results = ctx.normalize_batch(objects.iter_mut(), &mut reports);

        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err(),
            &PrimfitError::Param(ParamError::UnknownType("Teapot".into()))
        );
        assert!(results[2].is_ok());
        assert_eq!(
            reports,
            vec![(ReportLevel::Error, "teapot: unknown primitive type: Teapot".to_string())]
        );
        assert_eq!(objects[1].transform, scaled);
        assert_abs_diff_eq!(float(&objects[2], names::RING_RADIUS), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_convert_batch() {
        let ctx = PrimfitContext::default();
        let good = MemoryObject::mesh("good", box_mesh(1.0, 2.0, 3.0));
        let bad = MemoryObject::mesh("bad", Vec::new());
        let mut t1 = MemoryObject::primitive("t1", ShapeType::UVSphere);
        let mut t2 = MemoryObject::primitive("t2", ShapeType::UVSphere);
        let mut reports: Vec<(ReportLevel, String)> = Vec::new();
        let results = ctx.convert_batch([(&good, &mut t1), (&bad, &mut t2)], &mut reports);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::DegenerateGeometry);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].1.starts_with("bad: "));
        assert_abs_diff_eq!(float(&t1, names::RADIUS), 1.5, epsilon = 1e-9);
    }

    struct CountingDefaults {
        loads: Cell<usize>,
    }

    impl DefaultSource for CountingDefaults {
        fn load(&self, shape: ShapeType) -> std::result::Result<ParamMap, ParamError> {
            self.loads.set(self.loads.get() + 1);
            BuiltinDefaults.load(shape)
        }
    }

    #[test]
    fn test_restore_defaults_by_group() {
        let source = CountingDefaults { loads: Cell::new(0) };
        let mut ctx = PrimfitContext::with_defaults(Settings::default(), source);
        let mut cyl = MemoryObject::primitive("cyl", ShapeType::Cylinder);
        cyl.store.write(names::RADIUS, ParamValue::Float(5.0)).unwrap();
        cyl.store.write(names::DIV_CIRCLE, ParamValue::Int(64)).unwrap();
        cyl.store.write(names::SMOOTH, ParamValue::Bool(false)).unwrap();

        let size_only = RestoreOptions {
            size: true,
            division: false,
        };
        assert_eq!(ctx.restore_defaults(&mut cyl, size_only).unwrap(), 2);
        assert_eq!(float(&cyl, names::RADIUS), 1.0);
        assert_eq!(cyl.store.read(names::DIV_CIRCLE), Some(ParamValue::Int(64)));

        let division_only = RestoreOptions {
            size: false,
            division: true,
        };
        assert_eq!(ctx.restore_defaults(&mut cyl, division_only).unwrap(), 3);
        assert_eq!(cyl.store.read(names::DIV_CIRCLE), Some(ParamValue::Int(32)));
        assert_eq!(cyl.store.read(names::SMOOTH), Some(ParamValue::Bool(false)));

        let nothing = RestoreOptions {
            size: false,
            division: false,
        };
        let revision = cyl.store.revision();
        assert_eq!(ctx.restore_defaults(&mut cyl, nothing).unwrap(), 0);
        assert_eq!(cyl.store.revision(), revision);
        assert_eq!(ctx.defaults_for(ShapeType::Cylinder).unwrap().len(), 7);
        assert_eq!(ctx.source().loads.get(), 1);
    }

    fn dcube_world_corners(obj: &MemoryObject) -> Vec<Point3> {
        let [lx, hx, ly, hy, lz, hz] = [
            names::MIN_X,
            names::MAX_X,
            names::MIN_Y,
            names::MAX_Y,
            names::MIN_Z,
            names::MAX_Z,
        ]
        .map(|n| float(obj, n));
        box_corners(Vec3::new(-lx, -ly, -lz), Vec3::new(hx, hy, hz))
            .iter()
            .map(|p| obj.transform.apply_point(p))
            .collect()
    }

    #[test]
    fn test_center_deformable_cube() {
        let ctx = PrimfitContext::default();
        let mut dc = MemoryObject::primitive("dc", ShapeType::DeformableCube).with_transform(
            ObjectTransform::translation(1.0, 2.0, 3.0)
                .with_rotation(rotation_z(0.5))
                .with_scale(2.0, 1.0, 0.5),
        );
        dc.store.write(names::MIN_X, ParamValue::Float(1.0)).unwrap();
        dc.store.write(names::MAX_X, ParamValue::Float(3.0)).unwrap();
        dc.store.write(names::MAX_Z, ParamValue::Float(0.0)).unwrap();
        let before = dcube_world_corners(&dc);

        ctx.center_deformable_cube(&mut dc).unwrap();
        assert_eq!(float(&dc, names::MIN_X), 2.0);
        assert_eq!(float(&dc, names::MAX_X), 2.0);
        assert_eq!(float(&dc, names::MIN_Z), 0.5);
        assert_eq!(dc.store.revision(), 1);
        assert_same_points(&before, &dcube_world_corners(&dc));

        let mut cube = MemoryObject::primitive("cube", ShapeType::Cube);
        let err = ctx.center_deformable_cube(&mut cube).unwrap_err();
        assert!(matches!(err, PrimfitError::WrongType { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
