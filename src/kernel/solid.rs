use glam::{DQuat, DVec3};
use truck_meshalgo::prelude::{MeshableShape, MeshedShape, OptimizingFilter, PolygonMesh};
use truck_modeling::{builder, Point3, Rad, Vector3};

use super::tolerance::Tolerance;
use crate::error::{ModelError, Result};
use crate::math::Aabb;

pub(crate) fn to_point(v: DVec3) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}

pub(crate) fn to_vector(v: DVec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

/// A boundary-represented solid and its world-space bounds
///
/// Bounds are exact for axis-aligned placements and a conservative box
/// around the rotated bounds otherwise.
#[derive(Debug, Clone)]
pub struct Solid {
    body: truck_modeling::Solid,
    bounds: Aabb,
}

impl Solid {
    pub(crate) fn new(body: truck_modeling::Solid, bounds: Aabb) -> Self {
        Self { body, bounds }
    }

    /// The underlying kernel solid
    pub fn body(&self) -> &truck_modeling::Solid {
        &self.body
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    pub fn center(&self) -> DVec3 {
        self.bounds.center()
    }

    /// Copy of this solid moved by `offset`
    pub fn translate(&self, offset: DVec3) -> Solid {
        Solid {
            body: builder::translated(&self.body, to_vector(offset)),
            bounds: Aabb::new(self.bounds.min + offset, self.bounds.max + offset),
        }
    }

    /// Copy of this solid rotated by `degrees` about `axis` through its center
    pub fn rotate_about_center(&self, axis: DVec3, degrees: f64) -> Result<Solid> {
        let axis = axis.try_normalize().ok_or_else(|| {
            ModelError::kernel(format!("rotation axis must be non-zero: {:?}", axis))
        })?;
        let center = self.center();
        let angle = degrees.to_radians();

        let body = builder::rotated(&self.body, to_point(center), to_vector(axis), Rad(angle));

        let rotation = DQuat::from_axis_angle(axis, angle);
        let corners: Vec<DVec3> = corners(&self.bounds)
            .map(|c| center + rotation * (c - center))
            .collect();
        let bounds = Aabb::from_points(&corners).unwrap_or(self.bounds);

        Ok(Solid { body, bounds })
    }

    /// Triangulate the boundary within `tolerance`
    ///
    /// Coincident positions along shared edges are merged so adjacent faces
    /// reference the same vertices.
    pub fn tessellate(&self, tolerance: Tolerance) -> Result<PolygonMesh> {
        tolerance.validate()?;
        let mut polygon = self.body.triangulation(tolerance.deflection()).to_polygon();
        polygon
            .put_together_same_attrs(truck_modeling::TOLERANCE)
            .remove_degenerate_faces()
            .remove_unused_attrs();
        Ok(polygon)
    }
}

fn corners(bounds: &Aabb) -> impl Iterator<Item = DVec3> + '_ {
    (0..8).map(move |i| {
        DVec3::new(
            if i & 1 == 0 { bounds.min.x } else { bounds.max.x },
            if i & 2 == 0 { bounds.min.y } else { bounds.max.y },
            if i & 4 == 0 { bounds.min.z } else { bounds.max.z },
        )
    })
}
