//! Own the particles and advance them, one tick at a time.

use rand::Rng;
use rayon::prelude::*;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::errors::ParticleFieldError;
use crate::modes::{ForceInput, Mode};
use crate::particle::Particle;
use crate::pointer::{Bounds, Pointer};

/// The weakest intensity a user can choose.
pub const MIN_INTENSITY: f64 = 20.0;

/// The strongest intensity a user can choose.
pub const MAX_INTENSITY: f64 = 100.0;

/// The radius of the pointer's influence is this many times the intensity.
pub const INTENSITY_TO_DISTANCE: f64 = 4.0;

/// Everything that is the same for every particle during a single tick. Taken once at the start
/// of the tick so that no particle can see a different pointer, mode or time to another.
#[derive(Debug, Clone, Copy)]
struct Tick<'config> {
    /// The pointer
    pointer: Pointer,
    /// The force-field mode
    mode: Mode,
    /// The radius of the pointer's influence
    max_distance: f64,
    /// The clock's time for this tick
    time: f64,
    /// The canvas
    bounds: Bounds,
    /// Simulation constants
    config: &'config Config,
}

/// The whole population of particles on a canvas.
#[derive(Debug)]
pub struct ParticleField<C = SystemClock> {
    /// All the particles, in a stable order
    particles: Vec<Particle>,
    /// The canvas the particles are confined to
    bounds: Bounds,
    /// Simulation constants
    config: Config,
    /// Where time-dependent modes get the time from
    clock: C,
}

impl ParticleField<SystemClock> {
    /// A field of `config.particle_count` random particles that reads the wall clock.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite, or the config is invalid.
    pub fn new(width: f64, height: f64, config: Config) -> Result<Self, ParticleFieldError> {
        Self::with_clock(width, height, config, SystemClock)
    }
}

impl<C: Clock> ParticleField<C> {
    /// A field of `config.particle_count` random particles, reading time from the given clock.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite, or the config is invalid.
    pub fn with_clock(
        width: f64,
        height: f64,
        config: Config,
        clock: C,
    ) -> Result<Self, ParticleFieldError> {
        Self::with_rng(width, height, config, clock, &mut rand::thread_rng())
    }

    /// A field whose initial particles come from the given random number generator, so that the
    /// starting state can be reproduced.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite, or the config is invalid.
    pub fn with_rng(
        width: f64,
        height: f64,
        config: Config,
        clock: C,
        rng: &mut impl Rng,
    ) -> Result<Self, ParticleFieldError> {
        let bounds = Bounds::new(width, height)?;
        config.validate()?;
        let count = config.particle_count;
        let mut field = Self {
            particles: Vec::new(),
            bounds,
            config,
            clock,
        };
        field.populate(bounds, count, rng);
        Ok(field)
    }

    /// A field made from already existing particles.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite, or the config is invalid.
    pub fn from_particles(
        width: f64,
        height: f64,
        config: Config,
        clock: C,
        particles: Vec<Particle>,
    ) -> Result<Self, ParticleFieldError> {
        config.validate()?;
        Ok(Self {
            particles,
            bounds: Bounds::new(width, height)?,
            config,
            clock,
        })
    }

    /// Replace every particle with `count` new random ones on a canvas of the given size.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite. The existing particles are left
    /// untouched in that case.
    pub fn initialise(
        &mut self,
        width: f64,
        height: f64,
        count: usize,
    ) -> Result<(), ParticleFieldError> {
        self.initialise_with_rng(width, height, count, &mut rand::thread_rng())
    }

    /// Like [`ParticleField::initialise`], but with a given random number generator.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite.
    pub fn initialise_with_rng(
        &mut self,
        width: f64,
        height: f64,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<(), ParticleFieldError> {
        let bounds = Bounds::new(width, height)?;
        self.populate(bounds, count, rng);
        Ok(())
    }

    /// Replace every particle with fresh ones on a canvas of the new size. Used when the canvas
    /// is resized.
    ///
    /// # Errors
    /// When the canvas dimensions aren't positive and finite.
    pub fn reset(&mut self, width: f64, height: f64) -> Result<(), ParticleFieldError> {
        self.initialise(width, height, self.config.particle_count)
    }

    /// Swap the whole population for a new random one.
    fn populate(&mut self, bounds: Bounds, count: usize, rng: &mut impl Rng) {
        self.bounds = bounds;
        self.particles = (0..count)
            .map(|_| Particle::random(rng, &bounds, &self.config))
            .collect();
        tracing::debug!(
            "Particle field populated with {count} particles on a {}x{} canvas",
            bounds.width,
            bounds.height
        );
    }

    /// Advance every particle by one tick.
    ///
    /// `intensity` is clamped to `20.0..=100.0`.
    pub fn step(&mut self, pointer: &Pointer, mode: Mode, intensity: f64) {
        let tick = Self::begin_tick(
            &self.config,
            &self.clock,
            self.bounds,
            pointer,
            mode,
            intensity,
        );
        for particle in &mut self.particles {
            advance(particle, &tick);
        }
    }

    /// The same as [`ParticleField::step`] but spread over all available cores. Particles don't
    /// interact with each other, so the result is identical.
    pub fn step_parallel(&mut self, pointer: &Pointer, mode: Mode, intensity: f64) {
        let tick = Self::begin_tick(
            &self.config,
            &self.clock,
            self.bounds,
            pointer,
            mode,
            intensity,
        );
        self.particles
            .par_iter_mut()
            .for_each(|particle| advance(particle, &tick));
    }

    /// Snapshot everything a tick needs. Takes the fields it reads rather than `&self`, so that
    /// the particles can be borrowed mutably while the snapshot is alive.
    fn begin_tick<'config>(
        config: &'config Config,
        clock: &C,
        bounds: Bounds,
        pointer: &Pointer,
        mode: Mode,
        intensity: f64,
    ) -> Tick<'config> {
        Tick {
            pointer: *pointer,
            mode,
            max_distance: max_distance(intensity),
            time: clock.now_millis(),
            bounds,
            config,
        }
    }

    /// All the particles, in a stable order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The canvas the particles are confined to.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Simulation constants.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// The clock, mutably. Useful for moving a [`crate::ManualClock`] forward between ticks.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

/// The radius of the pointer's influence. Always positive and finite, whatever the intensity.
#[must_use]
pub fn max_distance(intensity: f64) -> f64 {
    let intensity = if intensity.is_nan() {
        MIN_INTENSITY
    } else {
        intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)
    };
    (intensity * INTENSITY_TO_DISTANCE).max(f64::EPSILON)
}

/// The whole life of one particle during one tick.
fn advance(particle: &mut Particle, tick: &Tick<'_>) {
    if tick.pointer.is_active {
        let offset = tick.pointer.position - particle.position;
        let distance = offset.length();
        if distance < tick.max_distance {
            let input = ForceInput {
                force: (tick.max_distance - distance) / tick.max_distance,
                angle: offset.y.atan2(offset.x),
                distance,
                max_distance: tick.max_distance,
                hue: particle.hue,
                x: particle.position.x,
                base_radius: particle.base_radius,
                time: tick.time,
            };
            particle.apply_force(&tick.mode.apply(&input));
        }
    }

    particle.integrate(tick.config.friction);
    particle.record_trail();
    particle.bounce(&tick.bounds, tick.config.restitution);
    particle.relax_radius(tick.config.radius_relaxation);
}
