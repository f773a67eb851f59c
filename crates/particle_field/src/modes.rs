//! The 5 force-field modes. Each one decides how a particle near the pointer has its velocity,
//! hue and radius changed.
//!
//! Modes are stateless: every mode is a pure function of a [`ForceInput`], which makes them easy
//! to reason about in isolation.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use snafu::OptionExt as _;

use crate::canvas::Colour;
use crate::errors::{ParticleFieldError, UnknownModeSnafu};

/// A hue wraps at this many degrees.
pub const FULL_CIRCLE_DEGREES: f64 = 360.0;

/// The shape of the force field around the pointer.
#[derive(
    serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[expect(
    clippy::exhaustive_enums,
    reason = "The 5 modes are the complete set, callers should match on all of them"
)]
pub enum Mode {
    /// Pull particles toward the pointer
    #[default]
    Attraction,
    /// Push particles away from the pointer
    Repulsion,
    /// Swing particles around the pointer, with a slight pull inwards
    Orbital,
    /// A whirlpool whose swirl tightens closer to the pointer
    Vortex,
    /// Ripples that alternately push and pull as they travel outwards
    Wave,
}

/// Everything a mode needs to know about a particle that is inside the pointer's influence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "It's the complete set of inputs to the force formulas"
)]
pub struct ForceInput {
    /// How strongly the particle is affected, from 0.0 at the edge of influence to 1.0 at the
    /// pointer itself
    pub force: f64,
    /// Direction from the particle to the pointer, in radians
    pub angle: f64,
    /// Distance from the particle to the pointer
    pub distance: f64,
    /// The radius of the pointer's influence
    pub max_distance: f64,
    /// The particle's current hue, in degrees
    pub hue: f64,
    /// The particle's x position
    pub x: f64,
    /// The particle's resting radius
    pub base_radius: f64,
    /// The time of this tick, in milliseconds
    pub time: f64,
}

/// What a mode does to a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A mode only ever changes these 3 things"
)]
pub struct ForceResponse {
    /// Added to the particle's velocity
    pub velocity_delta: DVec2,
    /// The particle's new hue, always in `0.0..360.0`
    pub hue: f64,
    /// The particle's new radius
    pub radius: f64,
}

impl Mode {
    /// All the modes, in the order they're offered to users.
    pub const ALL: [Self; 5] = [
        Self::Attraction,
        Self::Repulsion,
        Self::Orbital,
        Self::Vortex,
        Self::Wave,
    ];

    /// Calculate the effect of this mode on a particle.
    #[must_use]
    pub fn apply(self, input: &ForceInput) -> ForceResponse {
        let response = match self {
            Self::Attraction => attraction(input),
            Self::Repulsion => repulsion(input),
            Self::Orbital => orbital(input),
            Self::Vortex => vortex(input),
            Self::Wave => wave(input),
        };

        ForceResponse {
            hue: wrap_hue(response.hue),
            ..response
        }
    }

    /// The machine-friendly name, as used in config files and on the CLI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Attraction => "attraction",
            Self::Repulsion => "repulsion",
            Self::Orbital => "orbital",
            Self::Vortex => "vortex",
            Self::Wave => "wave",
        }
    }

    /// The human-friendly name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attraction => "Attraction",
            Self::Repulsion => "Repulsion",
            Self::Orbital => "Orbital",
            Self::Vortex => "Vortex",
            Self::Wave => "Wave",
        }
    }

    /// The colour of the halo drawn around the pointer, at its most opaque.
    #[must_use]
    pub fn halo_colour(self) -> Colour {
        match self {
            Self::Attraction => (100.0 / 255.0, 200.0 / 255.0, 1.0, 0.3),
            Self::Repulsion => (1.0, 100.0 / 255.0, 100.0 / 255.0, 0.3),
            Self::Orbital => (1.0, 200.0 / 255.0, 100.0 / 255.0, 0.3),
            Self::Vortex => (200.0 / 255.0, 100.0 / 255.0, 1.0, 0.4),
            Self::Wave => (100.0 / 255.0, 1.0, 200.0 / 255.0, 0.3),
        }
    }

    /// The mode after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = self.index().wrapping_add(1).rem_euclid(Self::ALL.len());
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// The mode before this one, wrapping around.
    #[must_use]
    pub fn previous(self) -> Self {
        let count = Self::ALL.len();
        let index = self.index().wrapping_add(count - 1).rem_euclid(count);
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Position in [`Mode::ALL`].
    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl std::str::FromStr for Mode {
    type Err = ParticleFieldError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let needle = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == needle)
            .context(UnknownModeSnafu {
                name,
                expected: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Wrap a hue into `0.0..360.0`. A plain remainder keeps the sign of negative hues, and
/// `rem_euclid` can round a tiny negative up to exactly 360.0, so both are guarded.
#[must_use]
pub fn wrap_hue(hue: f64) -> f64 {
    let wrapped = hue.rem_euclid(FULL_CIRCLE_DEGREES);
    if wrapped >= FULL_CIRCLE_DEGREES || wrapped.is_nan() {
        0.0
    } else {
        wrapped
    }
}

/// A unit vector pointing at `angle` radians.
fn direction(angle: f64) -> DVec2 {
    DVec2::from_angle(angle)
}

/// Pull toward the pointer, warming the hue slowly.
fn attraction(input: &ForceInput) -> ForceResponse {
    ForceResponse {
        velocity_delta: direction(input.angle) * input.force * 0.8,
        hue: input.hue + 2.0,
        radius: input.base_radius + input.force * 3.0,
    }
}

/// Push away from the pointer, harder than attraction pulls.
fn repulsion(input: &ForceInput) -> ForceResponse {
    ForceResponse {
        velocity_delta: -direction(input.angle) * input.force * 1.2,
        hue: input.hue + 5.0,
        radius: input.base_radius + input.force * 2.0,
    }
}

/// Mostly tangential, so particles circle the pointer. Hue maps distance onto a blue-to-red band.
fn orbital(input: &ForceInput) -> ForceResponse {
    let tangential = direction(input.angle + FRAC_PI_2) * input.force * 0.6;
    let radial = direction(input.angle) * input.force * 0.2;
    let pulse = (input.time * 0.01 + input.x * 0.01).sin();

    ForceResponse {
        velocity_delta: tangential + radial,
        hue: (input.distance / input.max_distance) * 240.0,
        radius: input.base_radius + pulse * 2.0,
    }
}

/// The tangent is twisted further the closer the particle is to the pointer.
fn vortex(input: &ForceInput) -> ForceResponse {
    let twist = input.angle + FRAC_PI_2 + input.force * PI;
    let tangential = direction(twist) * input.force * 0.8;
    let radial = direction(input.angle) * input.force * 0.3;

    ForceResponse {
        velocity_delta: tangential + radial,
        hue: input.time * 0.1 + input.distance * 2.0,
        radius: input.base_radius + (input.force * PI).sin() * 3.0,
    }
}

/// A radial sine wave travelling outwards over time.
fn wave(input: &ForceInput) -> ForceResponse {
    let wave_force = (input.distance * 0.05 + input.time * 0.01).sin() * input.force;

    ForceResponse {
        velocity_delta: direction(input.angle) * wave_force * 0.5,
        hue: input.distance * 3.0 + input.time * 0.1,
        radius: input.base_radius + wave_force.abs() * 2.0,
    }
}
