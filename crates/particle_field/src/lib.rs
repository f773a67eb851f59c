//! # Particle Field
//! A population of point particles on a bounded canvas, pushed around by a pointer-driven force
//! field.
//!
//! There are 2 halves to this library. [`ParticleField`] owns the particles and advances them one
//! tick at a time. [`Renderer`] draws the current population, with trails and glow, onto a
//! [`Canvas`]. Neither knows anything about where the pointer, mode or intensity come from: that
//! is up to whatever drives the loop.
//!
//! ```
//! use particle_field::{Canvas, Config, Mode, ParticleField, Pointer, Renderer};
//!
//! let config = Config::default();
//! let mut field = ParticleField::new(800.0, 600.0, config.clone()).unwrap();
//! let renderer = Renderer::new(&config, 0.25);
//! let mut canvas = Canvas::new(200, 150);
//!
//! let pointer = Pointer::new(400.0, 300.0, true);
//! field.step(&pointer, Mode::Vortex, 50.0);
//! renderer.render(&mut canvas, field.particles(), &pointer, Mode::Vortex, 50.0);
//! ```

#![expect(clippy::pub_use, reason = "How else are you supposed re-export??")]

pub mod canvas;
pub mod clock;
pub mod config;
pub mod errors;
pub mod modes;
pub mod particle;
pub mod pointer;
pub mod renderer;
pub mod simulation;

pub use canvas::{Canvas, Colour};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use errors::ParticleFieldError;
pub use modes::{ForceInput, ForceResponse, Mode};
pub use particle::{Particle, TrailSample};
pub use pointer::{Bounds, Pointer};
pub use renderer::Renderer;
pub use simulation::ParticleField;
