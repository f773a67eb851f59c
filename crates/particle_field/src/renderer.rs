//! Draw the particles, their trails and glow, and the pointer's halo onto a canvas.

use glam::DVec2;

use crate::canvas::{hsla, mix, Blend, Canvas, BACKGROUND, WHITE};
use crate::config::Config;
use crate::modes::Mode;
use crate::particle::Particle;
use crate::pointer::Pointer;

/// The pointer's halo reaches this many times the intensity.
const HALO_RADIUS_PER_INTENSITY: f64 = 2.0;

/// The radius of the solid marker drawn at the pointer.
const CURSOR_MARKER_RADIUS: f64 = 8.0;

/// The opacity of the solid marker drawn at the pointer.
const CURSOR_MARKER_ALPHA: f32 = 0.8;

/// A glow reaches this many times the particle's current radius.
const GLOW_RADIUS_FACTOR: f64 = 2.0;

/// The brightest a glow gets, as a fraction of the particle's opacity.
const GLOW_STRENGTH: f32 = 0.35;

/// The largest a trail sample gets, as a fraction of the particle's resting radius.
const TRAIL_RADIUS_FACTOR: f64 = 0.5;

/// The most opaque a trail sample gets, as a fraction of the particle's opacity.
const TRAIL_ALPHA_FACTOR: f64 = 0.3;

/// Draws frames. It holds no per-frame state: everything persistent lives either in the
/// particles or on the canvas itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct Renderer {
    /// Canvas pixels per unit of simulation space
    pub scale: f64,
    /// The opacity of the dark veil laid over the previous frame
    pub fade_alpha: f32,
}

impl Renderer {
    /// Instantiate. `scale` is how many canvas pixels a unit of simulation space covers, so a
    /// scale of 0.5 draws an 800x600 field onto a 400x300 canvas.
    #[must_use]
    pub const fn new(config: &Config, scale: f64) -> Self {
        Self {
            scale,
            fade_alpha: config.fade_alpha,
        }
    }

    /// Draw one frame.
    pub fn render(
        &self,
        canvas: &mut Canvas,
        particles: &[Particle],
        pointer: &Pointer,
        mode: Mode,
        intensity: f64,
    ) {
        canvas.fade(BACKGROUND, self.fade_alpha);

        for particle in particles {
            self.draw_trail(canvas, particle);
            self.draw_body(canvas, particle);
        }

        if pointer.is_active {
            self.draw_pointer(canvas, pointer, mode, intensity);
        }
    }

    /// Older samples are smaller and fainter, growing linearly toward the newest.
    fn draw_trail(&self, canvas: &mut Canvas, particle: &Particle) {
        let trail = particle.trail();
        #[expect(
            clippy::as_conversions,
            clippy::cast_precision_loss,
            reason = "Trails are only ever a handful of samples long"
        )]
        let length = trail.len() as f64;
        for (index, sample) in trail.iter().enumerate() {
            #[expect(
                clippy::as_conversions,
                clippy::cast_precision_loss,
                reason = "Trails are only ever a handful of samples long"
            )]
            let t = index as f64 / length;
            let radius = particle.base_radius * t * TRAIL_RADIUS_FACTOR;
            #[expect(
                clippy::as_conversions,
                clippy::cast_possible_truncation,
                reason = "Alpha only needs f32 precision"
            )]
            let alpha = (sample.opacity * t * TRAIL_ALPHA_FACTOR) as f32;
            let colour = hsla(particle.hue, 0.8, 0.6, alpha);
            canvas.fill_circle(
                self.to_canvas(sample.position),
                radius * self.scale,
                Blend::Over,
                |_| colour,
            );
        }
    }

    /// A radial gradient from a bright core to a darker, fainter rim, then an additive glow
    /// around it.
    fn draw_body(&self, canvas: &mut Canvas, particle: &Particle) {
        #[expect(
            clippy::as_conversions,
            clippy::cast_possible_truncation,
            reason = "Alpha only needs f32 precision"
        )]
        let opacity = particle.opacity as f32;
        let centre = self.to_canvas(particle.position);

        let core = hsla(particle.hue, 1.0, 0.8, opacity);
        let rim = hsla(particle.hue, 0.8, 0.4, opacity * 0.3);
        canvas.fill_circle(centre, particle.radius * self.scale, Blend::Over, |t| {
            mix(core, rim, t)
        });

        let glow = hsla(particle.hue, 1.0, 0.6, opacity * GLOW_STRENGTH);
        canvas.fill_circle(
            centre,
            particle.radius * GLOW_RADIUS_FACTOR * self.scale,
            Blend::Add,
            |t| {
                let falloff = (1.0 - t) * (1.0 - t);
                (glow.0, glow.1, glow.2, glow.3 * falloff)
            },
        );
    }

    /// The area of the pointer's influence, tinted by mode, and a marker for the pointer itself.
    fn draw_pointer(&self, canvas: &mut Canvas, pointer: &Pointer, mode: Mode, intensity: f64) {
        let centre = self.to_canvas(pointer.position);
        let halo = mode.halo_colour();
        let transparent = (halo.0, halo.1, halo.2, 0.0);
        canvas.fill_circle(
            centre,
            intensity * HALO_RADIUS_PER_INTENSITY * self.scale,
            Blend::Over,
            |t| mix(halo, transparent, t),
        );

        let marker = (WHITE.0, WHITE.1, WHITE.2, CURSOR_MARKER_ALPHA);
        canvas.fill_circle(
            centre,
            CURSOR_MARKER_RADIUS * self.scale,
            Blend::Over,
            |_| marker,
        );
    }

    /// Simulation space to canvas pixels.
    fn to_canvas(&self, position: DVec2) -> DVec2 {
        position * self.scale
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::Colour;

    fn brightness(colour: Colour) -> f32 {
        colour.0 + colour.1 + colour.2
    }

    fn lone_particle(x: f64, y: f64) -> Particle {
        Particle::new(DVec2::new(x, y), 4.0, 1.0, 0.0, 8)
    }

    #[test]
    fn particles_light_up_the_canvas_under_them() {
        let renderer = Renderer::new(&Config::default(), 1.0);
        let mut canvas = Canvas::new(40, 40);
        let particle = lone_particle(20.0, 20.0);

        renderer.render(&mut canvas, &[particle], &Pointer::INACTIVE, Mode::Wave, 50.0);

        let centre = canvas.pixel(20, 20).unwrap();
        let corner = canvas.pixel(0, 0).unwrap();
        assert!(brightness(centre) > brightness(corner) + 0.5);
        assert!(centre.0 > centre.2, "hue 0 should be red: {centre:?}");
    }

    #[test]
    fn previous_frames_fade_away() {
        let renderer = Renderer::new(&Config::default(), 1.0);
        let mut canvas = Canvas::new(40, 40);
        renderer.render(
            &mut canvas,
            &[lone_particle(20.0, 20.0)],
            &Pointer::INACTIVE,
            Mode::Attraction,
            50.0,
        );
        let lit = brightness(canvas.pixel(20, 20).unwrap());

        renderer.render(&mut canvas, &[], &Pointer::INACTIVE, Mode::Attraction, 50.0);
        let faded = brightness(canvas.pixel(20, 20).unwrap());

        assert!(faded < lit);
        assert!(faded > brightness(BACKGROUND));
    }

    #[test]
    fn halo_only_drawn_for_an_active_pointer() {
        let renderer = Renderer::new(&Config::default(), 1.0);
        let mut inactive = Canvas::new(200, 200);
        let mut active = Canvas::new(200, 200);
        let mut pointer = Pointer::new(100.0, 100.0, false);

        renderer.render(&mut inactive, &[], &pointer, Mode::Repulsion, 50.0);
        pointer.is_active = true;
        renderer.render(&mut active, &[], &pointer, Mode::Repulsion, 50.0);

        // Just outside the cursor marker, inside the halo.
        let inactive_pixel = inactive.pixel(115, 100).unwrap();
        let active_pixel = active.pixel(115, 100).unwrap();
        assert!(active_pixel.0 > inactive_pixel.0);
        assert!(active_pixel.0 > active_pixel.2, "repulsion halo is red");

        let marker = active.pixel(100, 100).unwrap();
        assert!(marker.0 > 0.8 && marker.1 > 0.8 && marker.2 > 0.8);
    }

    #[test]
    fn halo_colour_follows_mode() {
        let renderer = Renderer::new(&Config::default(), 1.0);
        let pointer = Pointer::new(100.0, 100.0, true);
        let mut attraction = Canvas::new(200, 200);
        let mut wave = Canvas::new(200, 200);

        renderer.render(&mut attraction, &[], &pointer, Mode::Attraction, 50.0);
        renderer.render(&mut wave, &[], &pointer, Mode::Wave, 50.0);

        assert_ne!(attraction.pixel(120, 100), wave.pixel(120, 100));
    }

    #[test]
    fn trails_are_drawn_behind_particles() {
        let renderer = Renderer::new(&Config::default(), 1.0);
        let mut particle = lone_particle(10.0, 20.0);
        for x in 10..=18 {
            particle.position.x = f64::from(x * 3);
            particle.record_trail();
        }
        particle.position.x = 75.0;

        let mut canvas = Canvas::new(100, 40);
        renderer.render(&mut canvas, &[particle], &Pointer::INACTIVE, Mode::Orbital, 50.0);

        // The newest trail sample, at x = 54, is clear of the glow around the body at x = 75.
        let trail_pixel = canvas.pixel(54, 20).unwrap();
        assert!(brightness(trail_pixel) > brightness(BACKGROUND));
    }

    #[test]
    fn scale_maps_simulation_space_onto_smaller_canvases() {
        let renderer = Renderer::new(&Config::default(), 0.25);
        let mut canvas = Canvas::new(200, 150);

        renderer.render(
            &mut canvas,
            &[lone_particle(400.0, 300.0)],
            &Pointer::INACTIVE,
            Mode::Vortex,
            50.0,
        );

        let centre = canvas.pixel(100, 75).unwrap();
        assert!(brightness(centre) > brightness(BACKGROUND));
    }
}
