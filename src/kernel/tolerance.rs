//! Deflection bound handed to the kernel mesher.
//!
//! The mesher refines every curve and surface until the distance between the
//! exact geometry and its polygonal approximation stays under a single
//! deflection value, so one number drives both chord length and facet angle.

use crate::error::{ModelError, Result};

/// Maximum distance between the exact surface and its triangulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Tolerance used by the precision strategy
    pub const COARSE: Tolerance = Tolerance(0.55);

    /// Tolerance used by the primitive shapes
    pub const FINE: Tolerance = Tolerance(0.1);

    pub const fn new(deflection: f64) -> Self {
        Self(deflection)
    }

    pub fn deflection(&self) -> f64 {
        self.0
    }

    /// The mesher panics on deflections at or below its geometric tolerance
    pub fn validate(&self) -> Result<()> {
        if self.0.is_finite() && self.0 > truck_modeling::TOLERANCE {
            Ok(())
        } else {
            Err(ModelError::kernel(format!(
                "deflection tolerance must be greater than {}: {}",
                truck_modeling::TOLERANCE,
                self.0
            )))
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::FINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Tolerance::COARSE.deflection(), 0.55);
        assert_eq!(Tolerance::FINE.deflection(), 0.1);
        assert_eq!(Tolerance::default(), Tolerance::FINE);
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(Tolerance::new(0.0).validate().is_err());
        assert!(Tolerance::new(-0.1).validate().is_err());
        assert!(Tolerance::new(f64::INFINITY).validate().is_err());
        assert!(Tolerance::new(f64::NAN).validate().is_err());
        assert!(Tolerance::FINE.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_below_kernel_precision() {
        let err = Tolerance::new(truck_modeling::TOLERANCE).validate().unwrap_err();
        assert!(matches!(err, ModelError::Kernel(_)));
        assert!(Tolerance::new(truck_modeling::TOLERANCE * 10.0).validate().is_ok());
    }
}
