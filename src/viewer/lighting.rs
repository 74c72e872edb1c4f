use glam::{Mat4, Vec3};

/// Light direction is fixed; only its strength and color are adjustable
pub const LIGHT_DIRECTION: [f32; 3] = [0.0, 0.0, -1.0];

/// Environment light and material response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentLight {
    pub color: [f32; 4],
    pub intensity: f32,
    pub ambient: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for EnvironmentLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            intensity: 1.0,
            ambient: 0.3,
            specular: 0.5,
            shininess: 32.0,
        }
    }
}

impl EnvironmentLight {
    /// Copy with every field inside the range the dialog offers
    pub fn clamped(&self) -> Self {
        Self {
            color: self.color.map(|c| c.clamp(0.0, 1.0)),
            intensity: self.intensity.clamp(0.0, 10.0),
            ambient: self.ambient.clamp(0.0, 1.0),
            specular: self.specular.clamp(0.0, 1.0),
            shininess: self.shininess.clamp(1.0, 128.0),
        }
    }
}

/// Per-frame shader uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub model_color: [f32; 4],
    /// rgb = light color, w = intensity
    pub light_color: [f32; 4],
    /// xyz = direction the light travels, w = ambient
    pub light_direction: [f32; 4],
    /// x = specular, y = shininess
    pub material: [f32; 4],
}

impl SceneUniform {
    pub fn new(view_proj: Mat4, eye: Vec3, model_color: [f32; 4], light: &EnvironmentLight) -> Self {
        let light = light.clamped();
        let [dx, dy, dz] = LIGHT_DIRECTION;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            model_color,
            light_color: [light.color[0], light.color[1], light.color[2], light.intensity],
            light_direction: [dx, dy, dz, light.ambient],
            material: [light.specular, light.shininess, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 64 + 5 * 16);
    }

    #[test]
    fn clamped_limits_ranges() {
        let light = EnvironmentLight {
            intensity: 20.0,
            ambient: -1.0,
            shininess: 0.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(light.intensity, 10.0);
        assert_eq!(light.ambient, 0.0);
        assert_eq!(light.shininess, 1.0);
    }

    #[test]
    fn uniform_packs_light() {
        let uniform = SceneUniform::new(
            Mat4::IDENTITY,
            Vec3::ONE,
            [0.5, 0.5, 1.0, 1.0],
            &EnvironmentLight::default(),
        );
        assert_eq!(uniform.light_direction, [0.0, 0.0, -1.0, 0.3]);
        assert_eq!(uniform.material[1], 32.0);
    }
}
