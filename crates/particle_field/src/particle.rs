//! A single particle and its trail.

use std::collections::VecDeque;

use glam::DVec2;
use rand::Rng;

use crate::config::Config;
use crate::modes::{ForceResponse, FULL_CIRCLE_DEGREES};
use crate::pointer::Bounds;

/// A remembered position of a particle, used for drawing its trail.
#[derive(Debug, Clone, Copy, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A trail sample is just a position and an opacity"
)]
pub struct TrailSample {
    /// Where the particle was
    pub position: DVec2,
    /// How opaque the particle was at the time
    pub opacity: f64,
}

/// A point on the canvas with velocity, size, colour and a short memory of where it's been.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Particle {
    /// Canvas-space position
    pub position: DVec2,
    /// Change in position per tick
    pub velocity: DVec2,
    /// The current, possibly inflated, radius
    pub radius: f64,
    /// The radius the particle relaxes back to
    pub base_radius: f64,
    /// Fixed at creation, in `0.0..=1.0`
    pub opacity: f64,
    /// Colour hue in degrees, `0.0..360.0`
    pub hue: f64,
    /// Past positions, oldest first
    trail: VecDeque<TrailSample>,
    /// The most samples the trail will hold
    trail_capacity: usize,
}

impl Particle {
    /// Build a particle at rest with an empty trail.
    #[must_use]
    pub fn new(position: DVec2, radius: f64, opacity: f64, hue: f64, trail_capacity: usize) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            radius,
            base_radius: radius,
            opacity,
            hue,
            trail: VecDeque::with_capacity(trail_capacity.saturating_add(1)),
            trail_capacity,
        }
    }

    /// A particle with a random position anywhere on the canvas, and random velocity, size,
    /// opacity and hue. `config` must have passed [`Config::validate`].
    pub(crate) fn random(rng: &mut impl Rng, bounds: &Bounds, config: &Config) -> Self {
        let position = DVec2::new(
            rng.gen_range(0.0..=bounds.width),
            rng.gen_range(0.0..=bounds.height),
        );
        let speed = config.initial_speed;
        let radius = rng.gen_range(config.min_radius..=config.max_radius);
        let opacity = rng.gen_range(config.min_opacity.clamp(f64::EPSILON, 1.0)..=1.0);
        let hue = rng.gen_range(0.0..FULL_CIRCLE_DEGREES);

        let mut particle = Self::new(position, radius, opacity, hue, config.trail_length);
        particle.velocity = DVec2::new(rng.gen_range(-speed..=speed), rng.gen_range(-speed..=speed));
        particle
    }

    /// Past positions, oldest first.
    #[must_use]
    pub const fn trail(&self) -> &VecDeque<TrailSample> {
        &self.trail
    }

    /// The most samples the trail will hold.
    #[must_use]
    pub const fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    /// Take on the effect of the force field.
    pub(crate) fn apply_force(&mut self, response: &ForceResponse) {
        self.velocity += response.velocity_delta;
        self.hue = response.hue;
        self.radius = response.radius;
    }

    /// Slow down, then move.
    pub(crate) fn integrate(&mut self, friction: f64) {
        self.velocity *= friction;
        self.position += self.velocity;
    }

    /// Remember the current position, forgetting the oldest one if the trail is full.
    pub(crate) fn record_trail(&mut self) {
        self.trail.push_back(TrailSample {
            position: self.position,
            opacity: self.opacity,
        });
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
    }

    /// Bounce off the edges of the canvas, losing some energy. Each axis is handled on its own.
    pub(crate) fn bounce(&mut self, bounds: &Bounds, restitution: f64) {
        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x *= -restitution;
            self.position.x = self.position.x.clamp(0.0, bounds.width);
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y *= -restitution;
            self.position.y = self.position.y.clamp(0.0, bounds.height);
        }
    }

    /// Ease the radius back toward its resting size.
    pub(crate) fn relax_radius(&mut self, rate: f64) {
        self.radius = self.radius * (1.0 - rate) + self.base_radius * rate;
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng as _;

    use super::*;

    fn particle() -> Particle {
        Particle::new(DVec2::new(10.0, 10.0), 4.0, 1.0, 0.0, 8)
    }

    #[test]
    fn trail_is_bounded_and_oldest_first() {
        let mut particle = particle();
        for i in 0..12 {
            particle.position.x = f64::from(i);
            particle.record_trail();
            assert!(particle.trail().len() <= 8);
        }
        assert_eq!(particle.trail().len(), 8);
        let xs: Vec<f64> = particle.trail().iter().map(|sample| sample.position.x).collect();
        assert_eq!(xs, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn bounces_each_axis_independently() {
        let bounds = Bounds::new(100.0, 50.0).unwrap();
        let mut particle = particle();
        particle.position = DVec2::new(105.0, 20.0);
        particle.velocity = DVec2::new(2.0, 1.0);
        particle.bounce(&bounds, 0.8);
        assert!((particle.position.x - 100.0).abs() < f64::EPSILON);
        assert!((particle.velocity.x + 1.6).abs() < 1e-12);
        assert!((particle.velocity.y - 1.0).abs() < f64::EPSILON);

        particle.position = DVec2::new(50.0, -3.0);
        particle.velocity = DVec2::new(1.0, -2.0);
        particle.bounce(&bounds, 0.8);
        assert!(particle.position.y.abs() < f64::EPSILON);
        assert!((particle.velocity.y - 1.6).abs() < 1e-12);
    }

    #[test]
    fn radius_relaxes_toward_rest() {
        let mut particle = particle();
        particle.radius = 10.0;
        let mut gap = particle.radius - particle.base_radius;
        for _ in 0..100 {
            particle.relax_radius(0.05);
            let new_gap = (particle.radius - particle.base_radius).abs();
            assert!(new_gap < gap);
            gap = new_gap;
        }
        assert!(gap < 0.05);
    }

    #[test]
    fn random_particles_respect_config() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let bounds = Bounds::new(800.0, 600.0).unwrap();
        let config = Config::default();
        for _ in 0..500 {
            let particle = Particle::random(&mut rng, &bounds, &config);
            assert!(bounds.contains(particle.position));
            assert!((-1.5..=1.5).contains(&particle.velocity.x));
            assert!((-1.5..=1.5).contains(&particle.velocity.y));
            assert!((2.0..=6.0).contains(&particle.radius));
            assert!((particle.radius - particle.base_radius).abs() < f64::EPSILON);
            assert!((0.2..=1.0).contains(&particle.opacity));
            assert!((0.0..360.0).contains(&particle.hue));
            assert!(particle.trail().is_empty());
        }
    }
}
