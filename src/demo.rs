//! Demo module assembles the reference figure exported by `shape-scene`
//!
//! # Examples
//!
//! ```no_run
//! use shape_scene::demo::create_figure_scene;
//!
//! let mut scene = create_figure_scene().unwrap();
//! scene.export_stl("./target/model.stl").unwrap();
//! ```

use glam::DVec3;

use crate::error::Result;
use crate::object::{Cube, Cylinder, Primitive, PrimitiveKind, Pyramid, Sphere};
use crate::params::Parameters;
use crate::scene::{Scene, SceneMode};

// ============================================================================
// Placement helpers
// ============================================================================

/// Build a primitive and move it to `offset`
pub fn placed<K: PrimitiveKind>(parameters: Parameters, offset: DVec3) -> Result<Primitive<K>> {
    let mut part = Primitive::<K>::with_parameters(parameters);
    part.translate(offset)?;
    Ok(part)
}

/// Build a primitive, spin it about its own center, then move it
pub fn rotated<K: PrimitiveKind>(
    parameters: Parameters,
    axis: DVec3,
    degrees: f64,
    offset: DVec3,
) -> Result<Primitive<K>> {
    let mut part = Primitive::<K>::with_parameters(parameters);
    part.rotate_about_center(axis, degrees)?;
    part.translate(offset)?;
    Ok(part)
}

// ============================================================================
// Figure
// ============================================================================

/// Torso, head, two arms, two legs and two feet, in precision mode
pub fn create_figure_scene() -> Result<Scene> {
    let mut scene = Scene::new(SceneMode::Precision);

    let torso = Parameters::from([("length", 15.0), ("width", 10.0), ("height", 20.0)]);
    let torso: Cube = placed(torso, DVec3::new(0.0, 0.0, 10.0))?;
    scene.add(torso);

    let head: Sphere = placed(Parameters::from([("radius", 5.0)]), DVec3::new(0.0, 0.0, 23.0))?;
    scene.add(head);

    let arm = Parameters::from([("height", 18.0), ("radius", 2.0)]);
    for (degrees, x) in [(90.0, -9.0), (-90.0, 9.0)] {
        let part: Cylinder = rotated(arm.clone(), DVec3::Z, degrees, DVec3::new(x, 0.0, 18.0))?;
        scene.add(part);
    }

    let leg = Parameters::from([("height", 22.0), ("radius", 2.5)]);
    for x in [-4.0, 4.0] {
        let part: Cylinder = placed(leg.clone(), DVec3::new(x, 0.0, -1.0))?;
        scene.add(part);
    }

    let foot = Parameters::from([("base", 6.0), ("height", 2.0)]);
    for x in [-4.0, 4.0] {
        let part: Pyramid = placed(foot.clone(), DVec3::new(x, 0.0, -12.0))?;
        scene.add(part);
    }

    log::debug!("reference figure assembled from {} parts", scene.len());
    Ok(scene)
}
