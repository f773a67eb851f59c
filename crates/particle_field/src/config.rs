//! All the variables that can be configured for the simulation

use crate::errors::{InvalidConfigSnafu, ParticleFieldError};

/// All the config for the simulation
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// The number of particles created at initialisation and on every reset
    pub particle_count: usize,
    /// Every particle's velocity is multiplied by this on every tick
    pub friction: f64,
    /// How much of a particle's speed survives bouncing off the edge of the canvas
    pub restitution: f64,
    /// The number of past positions remembered for each particle's trail
    pub trail_length: usize,
    /// The fraction of the resting radius mixed back into a particle's radius every tick
    pub radius_relaxation: f64,
    /// New particles get a random speed in `-initial_speed..=initial_speed` on each axis
    pub initial_speed: f64,
    /// The smallest resting radius of a new particle
    pub min_radius: f64,
    /// The largest resting radius of a new particle
    pub max_radius: f64,
    /// The least opaque a new particle can be
    pub min_opacity: f64,
    /// The opacity of the dark fill laid over the previous frame. Lower values give longer
    /// motion blur.
    pub fade_alpha: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 120,
            friction: 0.95,
            restitution: 0.8,
            trail_length: 8,
            radius_relaxation: 0.05,
            initial_speed: 1.5,
            min_radius: 2.0,
            max_radius: 6.0,
            min_opacity: 0.2,
            fade_alpha: 0.15,
        }
    }
}

impl Config {
    /// Check that every setting is something the simulation can run with. Config files can
    /// contain `nan` and `inf`, and some values make particles speed up or grow forever.
    ///
    /// # Errors
    /// Names the first setting that is out of range.
    pub fn validate(&self) -> Result<(), ParticleFieldError> {
        check("friction", self.friction, |value| value > 0.0 && value <= 1.0)?;
        check("restitution", self.restitution, |value| {
            (0.0..=1.0).contains(&value)
        })?;
        check("radius_relaxation", self.radius_relaxation, |value| {
            (0.0..=1.0).contains(&value)
        })?;
        check("initial_speed", self.initial_speed, |value| value >= 0.0)?;
        check("min_radius", self.min_radius, |value| value > 0.0)?;
        check("max_radius", self.max_radius, |value| value >= self.min_radius)?;
        check("min_opacity", self.min_opacity, |value| {
            (0.0..=1.0).contains(&value)
        })?;
        check("fade_alpha", f64::from(self.fade_alpha), |value| {
            (0.0..=1.0).contains(&value)
        })?;
        Ok(())
    }
}

/// A setting must be finite and pass its own range check.
fn check(
    field: &'static str,
    value: f64,
    is_in_range: impl Fn(f64) -> bool,
) -> Result<(), ParticleFieldError> {
    snafu::ensure!(
        value.is_finite() && is_in_range(value),
        InvalidConfigSnafu { field, value }
    );
    Ok(())
}
