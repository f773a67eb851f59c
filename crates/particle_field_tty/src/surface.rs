//! Draw a canvas of pixels, and some text, onto a terminal surface.

use particle_field::canvas::{Colour, BACKGROUND, WHITE};
use particle_field::Canvas;
use termwiz::surface::Change as TermwizChange;
use termwiz::surface::Position as TermwizPosition;

/// The character used to show 2 pixels in 1 cell. The upper pixel is the cell's foreground and
/// the lower pixel is the cell's background.
const UPPER_HALF_BLOCK: &str = "▀";

/// A terminal-sized grid of cells
pub(crate) struct Surface {
    /// The terminal's width
    pub width: usize,
    /// The terminal's height
    pub height: usize,
    /// A surface of terminal cells
    pub surface: termwiz::surface::Surface,
}

impl Surface {
    /// Instantiate
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            surface: termwiz::surface::Surface::new(width, height),
        }
    }

    /// The canvas size, in pixels, that exactly fills a terminal of the given size.
    #[must_use]
    pub const fn canvas_size_for(width: usize, height: usize) -> (usize, usize) {
        (width, height.saturating_mul(2))
    }

    /// Draw every pixel of the canvas using half blocks, 2 pixels to a cell. Anything that
    /// doesn't fit on the surface is cropped.
    pub fn add_canvas(&mut self, canvas: &Canvas) {
        let cols = self.width.min(canvas.width());
        let rows = self.height.min(canvas.height().div_ceil(2));

        for row in 0..rows {
            // Printing a character moves the cursor along, so only the start of each row needs
            // positioning.
            self.surface.add_change(TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(0),
                y: TermwizPosition::Absolute(row),
            });

            for col in 0..cols {
                let upper_y = row.saturating_mul(2);
                let upper = canvas.pixel(col, upper_y).unwrap_or(BACKGROUND);
                let lower = canvas
                    .pixel(col, upper_y.saturating_add(1))
                    .unwrap_or(BACKGROUND);
                self.surface
                    .add_changes(vec![Self::make_fg_colour(upper), Self::make_bg_colour(lower)]);
                self.surface.add_change(UPPER_HALF_BLOCK);
            }
        }
    }

    /// Overlay text at a given coord with the given colours.
    pub fn add_text(
        &mut self,
        x: usize,
        y: usize,
        text: &str,
        maybe_background_colour: Option<Colour>,
        maybe_foreground_colour: Option<Colour>,
    ) {
        let bg_colour = maybe_background_colour
            .map_or_else(Self::make_default_bg_colour, Self::make_bg_colour);
        let fg_colour = Self::make_fg_colour(maybe_foreground_colour.unwrap_or(WHITE));

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(x),
                y: TermwizPosition::Absolute(y),
            },
            bg_colour,
            fg_colour,
        ]);
        self.surface.add_change(text);
    }

    /// Make a Termwiz colour attribute
    #[must_use]
    pub const fn make_colour_attribute(colour: Colour) -> termwiz::color::ColorAttribute {
        termwiz::color::ColorAttribute::TrueColorWithDefaultFallback(termwiz::color::SrgbaTuple(
            colour.0, colour.1, colour.2, colour.3,
        ))
    }

    /// Make a Termwiz background colour
    #[must_use]
    pub const fn make_bg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// The terminal's own background colour, whatever that may be.
    #[must_use]
    pub const fn make_default_bg_colour() -> TermwizChange {
        let colour_attribute = termwiz::color::ColorAttribute::Default;
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make a Termwiz foreground colour
    #[must_use]
    pub const fn make_fg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Foreground(colour_attribute))
    }
}
