use glam::{Mat4, Vec3};

use crate::math::Aabb;

/// Degrees of orbit per pixel of mouse drag
pub const ORBIT_SENSITIVITY: f32 = 0.4;
/// Distance multiplier per scroll line
pub const ZOOM_STEP: f32 = 1.1;
/// Closest allowed approach to the center
pub const MIN_DISTANCE: f32 = 1e-3;

const MAX_ELEVATION: f32 = 89.0;

/// Turntable camera orbiting a center point, Z up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub center: Vec3,
    pub distance: f32,
    /// Rotation about +Z in degrees
    pub azimuth: f32,
    /// Angle above the XY plane in degrees
    pub elevation: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl OrbitCamera {
    pub fn new(center: Vec3, distance: f32, fov: f32) -> Self {
        Self {
            center,
            distance: distance.max(MIN_DISTANCE),
            azimuth: 30.0,
            elevation: 30.0,
            fov,
        }
    }

    /// Initial framing: distance is five times the largest extent, at least 2
    pub fn framing(bounds: &Aabb, centroid: Vec3, fov: f32) -> Self {
        let extent = bounds.max_extent() as f32;
        Self::new(centroid, (extent * 5.0).max(2.0), fov)
    }

    /// Re-center on a newly loaded mesh; keeps angles and fov
    pub fn refocus(&mut self, bounds: &Aabb, centroid: Vec3) {
        self.center = centroid;
        self.distance = (bounds.max_extent() as f32 * 2.0).max(MIN_DISTANCE);
    }

    /// Unit vector from the center towards the eye
    pub fn direction(&self) -> Vec3 {
        let (az, el) = (self.azimuth.to_radians(), self.elevation.to_radians());
        Vec3::new(el.cos() * az.sin(), -el.cos() * az.cos(), el.sin())
    }

    pub fn eye(&self) -> Vec3 {
        self.center + self.direction() * self.distance
    }

    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(360.0);
        self.elevation = (self.elevation + delta_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Positive `lines` move closer
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance / ZOOM_STEP.powf(lines)).max(MIN_DISTANCE);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.center, Vec3::Z)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let near = (self.distance * 1e-3).max(1e-4);
        let far = self.distance * 100.0 + 1.0;
        Mat4::perspective_rh(self.fov.to_radians(), aspect.max(1e-3), near, far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn unit_box() -> Aabb {
        Aabb::new(DVec3::ZERO, DVec3::new(1.0, 0.2, 0.1))
    }

    #[test]
    fn test_framing_distance() {
        let camera = OrbitCamera::framing(&unit_box(), Vec3::ZERO, 45.0);
        assert_relative_eq!(camera.distance, 5.0);

        let tiny = Aabb::new(DVec3::ZERO, DVec3::splat(0.1));
        let camera = OrbitCamera::framing(&tiny, Vec3::ZERO, 45.0);
        assert_relative_eq!(camera.distance, 2.0);
    }

    #[test]
    fn test_refocus_keeps_angles() {
        let mut camera = OrbitCamera::framing(&unit_box(), Vec3::ZERO, 45.0);
        camera.orbit(10.0, 5.0);
        let (az, el) = (camera.azimuth, camera.elevation);

        camera.refocus(&Aabb::new(DVec3::ZERO, DVec3::splat(4.0)), Vec3::ONE);
        assert_relative_eq!(camera.distance, 8.0);
        assert_eq!(camera.center, Vec3::ONE);
        assert_eq!((camera.azimuth, camera.elevation), (az, el));
    }

    #[test]
    fn test_eye_distance() {
        let camera = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 7.0, 45.0);
        assert_relative_eq!(camera.eye().distance(camera.center), 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_wraps_and_clamps() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 1.0, 45.0);
        camera.orbit(350.0, 200.0);
        assert_relative_eq!(camera.azimuth, 20.0, epsilon = 1e-4);
        assert_eq!(camera.elevation, MAX_ELEVATION);
    }

    #[test]
    fn test_zoom_in_reduces_distance() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 10.0, 45.0);
        camera.zoom(1.0);
        assert!(camera.distance < 10.0);
        camera.zoom(-2.0);
        assert!(camera.distance > 10.0);
    }

    #[test]
    fn test_center_projects_to_middle() {
        let camera = OrbitCamera::new(Vec3::new(3.0, -1.0, 2.0), 5.0, 45.0);
        let clip = camera.view_proj(1.5) * camera.center.extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }
}
