use rand::Rng;
use rand_distr::StandardNormal;

use super::ModelingStrategy;
use crate::error::{ModelError, Result};
use crate::mesh::{icosphere, Mesh};
use crate::params::Parameters;

const DEFAULT_RADIUS: f64 = 1.0;
const DEFAULT_SUBDIVISIONS: f64 = 3.0;
const DEFAULT_NOISE_SCALE: f64 = 0.1;

/// Icosphere with every vertex coordinate jittered by Gaussian noise
#[derive(Debug, Clone, Default)]
pub struct OrganicStrategy {
    mesh: Option<Mesh>,
}

impl OrganicStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelingStrategy for OrganicStrategy {
    fn name(&self) -> &'static str {
        "organic model"
    }

    fn build_model(&mut self, parameters: &Parameters) -> Result<()> {
        let radius = parameters.get_or("radius", DEFAULT_RADIUS);
        let subdivisions = parameters.get_or("subdivisions", DEFAULT_SUBDIVISIONS);
        let noise_scale = parameters.get_or("noise_scale", DEFAULT_NOISE_SCALE);

        if !subdivisions.is_finite() || subdivisions < 0.0 || subdivisions.fract() != 0.0 {
            return Err(ModelError::mesh(format!(
                "subdivisions must be a non-negative integer: {}",
                subdivisions
            )));
        }

        let mut mesh = icosphere(subdivisions as u32, radius)?;
        if noise_scale != 0.0 {
            let mut rng = rand::thread_rng();
            for v in mesh.vertices_mut() {
                v.x += rng.sample::<f64, _>(StandardNormal) * noise_scale;
                v.y += rng.sample::<f64, _>(StandardNormal) * noise_scale;
                v.z += rng.sample::<f64, _>(StandardNormal) * noise_scale;
            }
        }

        log::debug!(
            "organic model: radius={} subdivisions={} noise={} ({} vertices)",
            radius,
            subdivisions,
            noise_scale,
            mesh.vertex_count()
        );
        self.mesh = Some(mesh);
        Ok(())
    }

    fn mesh(&self) -> Result<Mesh> {
        self.mesh.clone().ok_or(ModelError::Unbuilt("organic model"))
    }

    fn is_built(&self) -> bool {
        self.mesh.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_before_build_fails() {
        let strategy = OrganicStrategy::new();
        assert!(matches!(strategy.mesh(), Err(ModelError::Unbuilt(_))));
    }

    #[test]
    fn test_default_icosphere_counts() {
        let mut strategy = OrganicStrategy::new();
        strategy.build_model(&Parameters::new()).unwrap();
        let mesh = strategy.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 642);
        assert_eq!(mesh.triangle_count(), 1280);
    }

    #[test]
    fn test_zero_noise_is_exact_sphere() {
        let mut strategy = OrganicStrategy::new();
        strategy
            .build_model(&Parameters::from([
                ("radius", 2.0),
                ("subdivisions", 1.0),
                ("noise_scale", 0.0),
            ]))
            .unwrap();
        for v in strategy.mesh().unwrap().vertices() {
            assert_relative_eq!(v.length(), 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_noise_perturbs_vertices() {
        let mut strategy = OrganicStrategy::new();
        strategy
            .build_model(&Parameters::from([("subdivisions", 2.0), ("noise_scale", 0.5)]))
            .unwrap();
        let off_sphere = strategy
            .mesh()
            .unwrap()
            .vertices()
            .iter()
            .filter(|v| (v.length() - 1.0).abs() > 1e-6)
            .count();
        assert!(off_sphere > 0);
    }

    #[test]
    fn test_fractional_subdivisions_rejected() {
        let mut strategy = OrganicStrategy::new();
        let err = strategy
            .build_model(&Parameters::from([("subdivisions", 1.5)]))
            .unwrap_err();
        assert!(matches!(err, ModelError::Mesh(_)));
        assert!(!strategy.is_built());
    }

    #[test]
    fn test_subdivisions_above_engine_limit_rejected() {
        let mut strategy = OrganicStrategy::new();
        let err = strategy
            .build_model(&Parameters::from([("subdivisions", 9.0)]))
            .unwrap_err();
        assert!(matches!(err, ModelError::Mesh(_)));
        assert!(!strategy.is_built());
    }
}
