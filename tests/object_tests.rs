use approx::assert_relative_eq;
use glam::DVec3;
use shape_scene::{
    BaseObject, Cube, Cylinder, ModelError, ModelingStrategy, OrganicObject, OrganicStrategy,
    Parameters, PrecisionObject, PrecisionStrategy, Pyramid, SceneObject,
};

#[cfg(test)]
mod object_tests {
    use super::*;

    #[test]
    fn test_strategy_object_builds_lazily() {
        let mut object = PrecisionObject::new();
        assert!(!object.strategy().is_built());

        let mesh = object.mesh().unwrap();
        assert!(object.strategy().is_built());
        assert_eq!(mesh.triangle_count(), 12);
        assert!(object.model().is_some());
    }

    #[test]
    fn test_bare_strategies_report_unbuilt() {
        assert!(matches!(
            OrganicStrategy::default().mesh(),
            Err(ModelError::Unbuilt(_))
        ));
        assert!(matches!(
            PrecisionStrategy::default().mesh(),
            Err(ModelError::Unbuilt(_))
        ));
    }

    #[test]
    fn test_manipulate_rebuilds_with_new_length() {
        let mut object = PrecisionObject::new();
        let before = object.mesh().unwrap().bounds().unwrap().extents();
        assert_relative_eq!(before.x, 10.0, epsilon = 1e-9);

        object
            .manipulate(&Parameters::from([("length", 20.0)]))
            .unwrap();
        let after = object.mesh().unwrap().bounds().unwrap().extents();
        assert_relative_eq!(after.x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(after.y, 10.0, epsilon = 1e-9);
        assert_eq!(object.parameters().get("length"), Some(20.0));
    }

    #[test]
    fn test_organic_manipulate_changes_radius() {
        let mut object = OrganicObject::with_parameters(Parameters::from([
            ("subdivisions", 2.0),
            ("noise_scale", 0.0),
        ]));
        object
            .manipulate(&Parameters::from([("radius", 3.0)]))
            .unwrap();
        for v in object.mesh().unwrap().vertices() {
            assert_relative_eq!(v.length(), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_base_object_has_no_geometry() {
        let mut base = BaseObject::new(Parameters::from([("length", 1.0)]));
        assert!(matches!(base.build(), Err(ModelError::NotImplemented(_))));
        assert!(matches!(base.mesh(), Err(ModelError::NotImplemented(_))));
        assert_eq!(base.parameters().get("length"), Some(1.0));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let mut cube = Cube::with_parameters(Parameters::from([("length", -1.0)]));
        assert!(matches!(cube.build(), Err(ModelError::Kernel(_))));

        let mut organic =
            OrganicObject::with_parameters(Parameters::from([("subdivisions", 1.5)]));
        assert!(matches!(organic.mesh(), Err(ModelError::Mesh(_))));
    }

    #[test]
    fn test_placement_moves_the_mesh() {
        let mut cylinder =
            Cylinder::with_parameters(Parameters::from([("height", 22.0), ("radius", 2.5)]));
        cylinder.translate(DVec3::new(4.0, 0.0, -1.0)).unwrap();

        let bounds = cylinder.mesh().unwrap().bounds().unwrap();
        assert_relative_eq!(bounds.min.z, -12.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.z, 10.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.center().x, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pyramid_apex_is_nearly_a_point() {
        let mut pyramid =
            Pyramid::with_parameters(Parameters::from([("base", 6.0), ("height", 2.0)]));
        let mesh = pyramid.mesh().unwrap();
        let bounds = mesh.bounds().unwrap();

        assert_relative_eq!(bounds.extents().x, 6.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.extents().z, 2.0, epsilon = 1e-9);
        let top: Vec<_> = mesh.vertices().iter().filter(|v| v.z > 1.999).collect();
        assert!(!top.is_empty());
        assert!(top.iter().all(|v| v.x.abs() < 0.001 && v.y.abs() < 0.001));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Cube::new().kind(), "cube");
        assert_eq!(Pyramid::new().kind(), "pyramid");
        assert_eq!(PrecisionStrategy::default().name(), "precision model");
        assert_eq!(OrganicStrategy::default().name(), "organic model");
    }
}
