//! A simple RGBA raster that frames are drawn onto.

use glam::DVec2;
use palette::IntoColor as _;

/// An RGBA colour, each channel in `0.0..=1.0`.
pub type Colour = (f32, f32, f32, f32);

/// The night-sky colour behind all the particles.
pub const BACKGROUND: Colour = (5.0 / 255.0, 5.0 / 255.0, 15.0 / 255.0, 1.0);

/// A default pure white.
pub const WHITE: Colour = (1.0, 1.0, 1.0, 1.0);

/// How a drawn colour is combined with what's already on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Blend {
    /// Normal alpha compositing, the new colour painted over the old one
    Over,
    /// The new colour is added to the old one, brightening it. Used for glows.
    Add,
}

/// Build a colour from hue (degrees), saturation, lightness and alpha.
#[must_use]
pub fn hsla(hue: f64, saturation: f32, lightness: f32, alpha: f32) -> Colour {
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        reason = "Hue only needs f32 precision for display"
    )]
    let hue_f32 = hue as f32;
    let colour: palette::Srgba = palette::Hsla::new(hue_f32, saturation, lightness, alpha).into_color();
    colour.into_components()
}

/// Linearly interpolate between 2 colours. `t` of 0.0 gives `from`, 1.0 gives `to`.
#[must_use]
pub fn mix(from: Colour, to: Colour, t: f32) -> Colour {
    let t = t.clamp(0.0, 1.0);
    (
        from.0 + (to.0 - from.0) * t,
        from.1 + (to.1 - from.1) * t,
        from.2 + (to.2 - from.2) * t,
        from.3 + (to.3 - from.3) * t,
    )
}

/// A grid of RGBA pixels. `[0, 0]` is the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    /// Width in pixels
    width: usize,
    /// Height in pixels
    height: usize,
    /// Row-major pixels
    pixels: Vec<Colour>,
}

impl Canvas {
    /// A canvas filled with the background colour.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; width.saturating_mul(height)],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// All the pixels, row by row.
    #[must_use]
    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    /// The colour of a single pixel, if it's on the canvas.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Colour> {
        self.index(x, y)
            .and_then(|index| self.pixels.get(index))
            .copied()
    }

    /// Change the size, clearing everything back to the background.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    /// Paint every pixel with a solid colour.
    pub fn fill(&mut self, colour: Colour) {
        self.pixels.fill(colour);
    }

    /// Lay a translucent colour over the whole canvas. Repeated every frame this fades old
    /// content away, leaving motion trails.
    pub fn fade(&mut self, colour: Colour, alpha: f32) {
        let veil = (colour.0, colour.1, colour.2, alpha);
        for pixel in &mut self.pixels {
            *pixel = composite(*pixel, veil, Blend::Over);
        }
    }

    /// Blend a colour onto a single pixel. Coordinates off the canvas are silently ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, colour: Colour, blend: Blend) {
        let (Ok(x_usize), Ok(y_usize)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        let Some(index) = self.index(x_usize, y_usize) else {
            return;
        };
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = composite(*pixel, colour, blend);
        }
    }

    /// Draw a filled circle. `shade` is given the normalised distance from the centre (0.0 at the
    /// centre, 1.0 at the edge) and returns the colour for that ring, which is how radial
    /// gradients are made.
    ///
    /// A circle smaller than a pixel still lights up the pixel under its centre, just fainter,
    /// so that tiny particles don't vanish on coarse canvases.
    pub fn fill_circle(
        &mut self,
        centre: DVec2,
        radius: f64,
        blend: Blend,
        shade: impl Fn(f32) -> Colour,
    ) {
        if !(radius.is_finite() && radius > 0.0) || !centre.is_finite() {
            return;
        }

        if radius < 0.5 {
            #[expect(
                clippy::as_conversions,
                clippy::cast_possible_truncation,
                reason = "Coverage is only an approximation"
            )]
            let coverage = (std::f64::consts::PI * radius * radius).min(1.0) as f32;
            let colour = shade(0.0);
            let (x, y) = Self::pixel_coords(centre);
            self.blend_pixel(x, y, (colour.0, colour.1, colour.2, colour.3 * coverage), blend);
            return;
        }

        let (left, top) = Self::pixel_coords(centre - radius);
        let (right, bottom) = Self::pixel_coords(centre + radius);
        for y in top..=bottom {
            for x in left..=right {
                #[expect(
                    clippy::as_conversions,
                    clippy::cast_precision_loss,
                    reason = "Pixel coordinates are far smaller than f64's mantissa"
                )]
                let pixel_centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let distance = pixel_centre.distance(centre);
                if distance > radius {
                    continue;
                }
                #[expect(
                    clippy::as_conversions,
                    clippy::cast_possible_truncation,
                    reason = "A gradient position only needs f32 precision"
                )]
                let t = (distance / radius) as f32;
                self.blend_pixel(x, y, shade(t), blend);
            }
        }
    }

    /// The pixel that a canvas-space point falls in.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        reason = "Points outside i64 range can't be on the canvas anyway"
    )]
    fn pixel_coords(point: DVec2) -> (i64, i64) {
        (point.x.floor() as i64, point.y.floor() as i64)
    }

    /// Row-major index of a pixel.
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        y.checked_mul(self.width)?.checked_add(x)
    }
}

/// Combine a colour onto an existing one.
fn composite(below: Colour, above: Colour, blend: Blend) -> Colour {
    let alpha = above.3.clamp(0.0, 1.0);
    match blend {
        Blend::Over => (
            above.0 * alpha + below.0 * (1.0 - alpha),
            above.1 * alpha + below.1 * (1.0 - alpha),
            above.2 * alpha + below.2 * (1.0 - alpha),
            alpha + below.3 * (1.0 - alpha),
        ),
        Blend::Add => (
            (below.0 + above.0 * alpha).min(1.0),
            (below.1 + above.1 * alpha).min(1.0),
            (below.2 + above.2 * alpha).min(1.0),
            below.3.max(alpha),
        ),
    }
}
