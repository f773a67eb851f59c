//! The external inputs to the simulation: where the pointer is and how big the canvas is.

use glam::DVec2;

use crate::errors::{InvalidBoundsSnafu, ParticleFieldError};

/// The pointer is the only thing that perturbs the particles. It's read-only to the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A pointer is only ever a position and whether it's over the canvas"
)]
pub struct Pointer {
    /// Canvas-space position of the pointer
    pub position: DVec2,
    /// Whether the pointer is currently over the canvas
    pub is_active: bool,
}

impl Pointer {
    /// A pointer that isn't over the canvas.
    pub const INACTIVE: Self = Self {
        position: DVec2::ZERO,
        is_active: false,
    };

    /// Instantiate
    #[must_use]
    pub const fn new(x: f64, y: f64, is_active: bool) -> Self {
        Self {
            position: DVec2::new(x, y),
            is_active,
        }
    }
}

/// The size of the canvas that particles live on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Bounds {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
}

impl Bounds {
    /// Validate and build canvas bounds. Both dimensions must be positive and finite.
    ///
    /// # Errors
    /// When either dimension is zero, negative, NaN or infinite.
    pub fn new(width: f64, height: f64) -> Result<Self, ParticleFieldError> {
        let is_valid = |dimension: f64| dimension.is_finite() && dimension > 0.0;
        snafu::ensure!(
            is_valid(width) && is_valid(height),
            InvalidBoundsSnafu { width, height }
        );
        Ok(Self { width, height })
    }

    /// Is the position inside the canvas, edges included?
    #[must_use]
    pub fn contains(&self, position: DVec2) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(Bounds::new(0.0, 10.0).is_err());
        assert!(Bounds::new(10.0, -1.0).is_err());
        assert!(Bounds::new(f64::NAN, 10.0).is_err());
        assert!(Bounds::new(f64::INFINITY, 10.0).is_err());

        let error = Bounds::new(0.0, 600.0).unwrap_err();
        assert_eq!(error.to_string(), "Invalid canvas bounds: 0x600");
    }

    #[test]
    fn contains_includes_edges() {
        let bounds = Bounds::new(800.0, 600.0).unwrap();
        assert!(bounds.contains(DVec2::new(0.0, 0.0)));
        assert!(bounds.contains(DVec2::new(800.0, 600.0)));
        assert!(!bounds.contains(DVec2::new(800.1, 300.0)));
        assert!(!bounds.contains(DVec2::new(400.0, -0.1)));
    }
}
