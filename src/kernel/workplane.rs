use std::f64::consts::PI;

use glam::DVec3;
use truck_modeling::{builder, Rad, Vector3, Wire};

use super::solid::{to_point, Solid};
use crate::error::{ModelError, Result};
use crate::math::Aabb;

/// Revolution angle past a full turn, which closes swept shapes
const FULL_TURN: Rad<f64> = Rad(7.0);

/// Centered axis-aligned rectangle at height `z`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Profile {
    width: f64,
    depth: f64,
    z: f64,
}

impl Profile {
    /// Counter-clockwise seen from +Z
    fn wire(&self) -> Wire {
        let (hw, hd) = (self.width * 0.5, self.depth * 0.5);
        let v = [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)]
            .map(|(x, y)| builder::vertex(to_point(DVec3::new(x, y, self.z))));
        vec![
            builder::line(&v[0], &v[1]),
            builder::line(&v[1], &v[2]),
            builder::line(&v[2], &v[3]),
            builder::line(&v[3], &v[0]),
        ]
        .into()
    }
}

/// Fluent builder for solids on the XY construction plane
///
/// Solids are centered on the plane origin. Rectangle profiles stack up on
/// successive offset workplanes and are consumed by [`Workplane::loft`].
#[derive(Debug, Clone, Default)]
pub struct Workplane {
    offset: f64,
    profiles: Vec<Profile>,
}

impl Workplane {
    pub fn xy() -> Self {
        Self::default()
    }

    fn origin(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.offset)
    }

    pub fn cuboid(&self, length: f64, width: f64, height: f64) -> Result<Solid> {
        require_positive("box length", length)?;
        require_positive("box width", width)?;
        require_positive("box height", height)?;

        let half = DVec3::new(length, width, height) * 0.5;
        let corner = builder::vertex(to_point(self.origin() - half));
        let edge = builder::tsweep(&corner, Vector3::unit_x() * length);
        let face = builder::tsweep(&edge, Vector3::unit_y() * width);
        let body = builder::tsweep(&face, Vector3::unit_z() * height);

        Ok(Solid::new(
            body,
            Aabb::new(self.origin() - half, self.origin() + half),
        ))
    }

    /// Half-circle meridian revolved about Z, poles on the Z axis
    pub fn sphere(&self, radius: f64) -> Result<Solid> {
        require_positive("sphere radius", radius)?;

        let center = self.origin();
        let pole = builder::vertex(to_point(center + DVec3::Z * radius));
        let meridian: Wire = builder::rsweep(&pole, to_point(center), Vector3::unit_x(), Rad(PI));
        let shell = builder::cone(&meridian, Vector3::unit_z(), FULL_TURN);
        let body = truck_modeling::Solid::try_new(vec![shell])
            .map_err(|e| ModelError::kernel(format!("sphere shell is not closed: {}", e)))?;

        let half = DVec3::splat(radius);
        Ok(Solid::new(body, Aabb::new(center - half, center + half)))
    }

    /// Circular disk swept along Z
    pub fn cylinder(&self, height: f64, radius: f64) -> Result<Solid> {
        require_positive("cylinder height", height)?;
        require_positive("cylinder radius", radius)?;

        let bottom = self.origin() - DVec3::Z * (height * 0.5);
        let rim = builder::vertex(to_point(bottom + DVec3::X * radius));
        let circle: Wire = builder::rsweep(&rim, to_point(bottom), Vector3::unit_z(), FULL_TURN);
        let disk = builder::try_attach_plane(&[circle])?;
        let body = builder::tsweep(&disk, Vector3::unit_z() * height);

        let half = DVec3::new(radius, radius, height * 0.5);
        Ok(Solid::new(
            body,
            Aabb::new(self.origin() - half, self.origin() + half),
        ))
    }

    /// Add a centered rectangle profile on the current workplane
    pub fn rect(mut self, width: f64, depth: f64) -> Result<Self> {
        require_positive("rectangle width", width)?;
        require_positive("rectangle depth", depth)?;
        self.profiles.push(Profile {
            width,
            depth,
            z: self.offset,
        });
        Ok(self)
    }

    /// Move to a parallel workplane `offset` along the plane normal
    pub fn workplane(mut self, offset: f64) -> Self {
        self.offset += offset;
        self
    }

    /// Ruled loft through exactly two stacked profiles, capped at both ends
    pub fn loft(self) -> Result<Solid> {
        let [first, second] = <[Profile; 2]>::try_from(self.profiles.as_slice()).map_err(|_| {
            ModelError::kernel(format!(
                "loft needs exactly two profiles, got {}",
                self.profiles.len()
            ))
        })?;
        if (second.z - first.z).abs() <= f64::EPSILON {
            return Err(ModelError::kernel("loft profiles must lie on different workplanes"));
        }
        let (bottom, top) = if first.z < second.z {
            (first, second)
        } else {
            (second, first)
        };

        let (bottom_wire, top_wire) = (bottom.wire(), top.wire());
        let mut shell = builder::try_wire_homotopy(&bottom_wire, &top_wire)?;
        shell.push(builder::try_attach_plane(&[bottom_wire.inverse()])?);
        shell.push(builder::try_attach_plane(&[top_wire])?);
        let body = truck_modeling::Solid::try_new(vec![shell])
            .map_err(|e| ModelError::kernel(format!("loft shell is not closed: {}", e)))?;

        let half_w = bottom.width.max(top.width) * 0.5;
        let half_d = bottom.depth.max(top.depth) * 0.5;
        Ok(Solid::new(
            body,
            Aabb::new(
                DVec3::new(-half_w, -half_d, bottom.z),
                DVec3::new(half_w, half_d, top.z),
            ),
        ))
    }
}

fn require_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::kernel(format!("{} must be positive: {}", what, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::solid_to_mesh;
    use crate::kernel::Tolerance;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_bounds() {
        let solid = Workplane::xy().cuboid(15.0, 10.0, 20.0).unwrap();
        let extents = solid.bounding_box().extents();
        assert_eq!(extents, DVec3::new(15.0, 10.0, 20.0));
    }

    #[test]
    fn test_degenerate_box_rejected() {
        let err = Workplane::xy().cuboid(0.0, 10.0, 10.0).unwrap_err();
        assert!(matches!(err, ModelError::Kernel(_)));
        assert!(Workplane::xy().sphere(-1.0).is_err());
        assert!(Workplane::xy().cylinder(5.0, f64::NAN).is_err());
    }

    #[test]
    fn test_offset_workplane_moves_solid() {
        let solid = Workplane::xy().workplane(5.0).sphere(1.0).unwrap();
        assert_eq!(solid.center(), DVec3::new(0.0, 0.0, 5.0));

        let mesh = solid_to_mesh(&solid, Tolerance::FINE).unwrap();
        let bounds = mesh.bounds().unwrap();
        assert_relative_eq!(bounds.min.z, 4.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.z, 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_loft_spans_offset() {
        let solid = Workplane::xy()
            .rect(6.0, 6.0)
            .unwrap()
            .workplane(2.0)
            .rect(0.001, 0.001)
            .unwrap()
            .loft()
            .unwrap();

        let bb = solid.bounding_box();
        assert_relative_eq!(bb.min.z, 0.0);
        assert_relative_eq!(bb.max.z, 2.0);
        assert_relative_eq!(bb.extents().x, 6.0);

        let mesh = solid_to_mesh(&solid, Tolerance::FINE).unwrap();
        let meshed = mesh.bounds().unwrap();
        assert_relative_eq!(meshed.min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(meshed.max.z, 2.0, epsilon = 1e-9);
        assert_relative_eq!(meshed.extents().x, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_loft_accepts_descending_profiles() {
        let solid = Workplane::xy()
            .rect(1.0, 1.0)
            .unwrap()
            .workplane(-3.0)
            .rect(2.0, 2.0)
            .unwrap()
            .loft()
            .unwrap();

        let bb = solid.bounding_box();
        assert_relative_eq!(bb.min.z, -3.0);
        assert_relative_eq!(bb.max.z, 0.0);
        assert!(solid_to_mesh(&solid, Tolerance::FINE).is_ok());
    }

    #[test]
    fn test_loft_requires_two_profiles() {
        let one = Workplane::xy().rect(1.0, 1.0).unwrap();
        assert!(one.loft().is_err());

        let coplanar = Workplane::xy()
            .rect(1.0, 1.0)
            .unwrap()
            .rect(2.0, 2.0)
            .unwrap();
        assert!(coplanar.loft().is_err());
    }

    #[test]
    fn test_tessellated_sphere_lies_on_surface() {
        let solid = Workplane::xy().sphere(5.0).unwrap();
        let mesh = solid_to_mesh(&solid, Tolerance::FINE).unwrap();
        for v in mesh.vertices() {
            assert_relative_eq!(v.length(), 5.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cylinder_rim_on_radius() {
        let solid = Workplane::xy().cylinder(4.0, 2.0).unwrap();
        let mesh = solid_to_mesh(&solid, Tolerance::FINE).unwrap();
        for v in mesh.vertices() {
            let radial = DVec3::new(v.x, v.y, 0.0).length();
            assert!(radial <= 2.0 + 1e-6);
            assert!(v.z.abs() <= 2.0 + 1e-9);
        }
    }
}
