//! Run the simulation and draw it to the end user's terminal.

use std::collections::VecDeque;
use std::time::Instant;

use color_eyre::eyre::{bail, Result};
use glam::DVec2;
use particle_field::canvas::BACKGROUND;
use particle_field::{Canvas, ParticleField, Pointer, Renderer};
use termwiz::surface::Change as TermwizChange;
use termwiz::terminal::buffered::BufferedTerminal;
use termwiz::terminal::Terminal as TermwizTerminal;
use tokio::sync::broadcast::error::RecvError;

use crate::config::Config;
use crate::controls::{Action, Controls};
use crate::run::Protocol;
use crate::surface::Surface;

/// The number of recent frames the frame rate is averaged over.
const FPS_SAMPLES: usize = 30;

/// The simulation, its controls, and what it looks like.
pub(crate) struct Screen {
    /// User config
    config: Config,
    /// The particles
    field: ParticleField,
    /// Draws the particles onto the canvas
    renderer: Renderer,
    /// The pixels that persist between frames, for motion trails
    canvas: Canvas,
    /// Mode, intensity, play/pause and the pointer
    controls: Controls,
    /// The terminal's width
    width: usize,
    /// The terminal's height
    height: usize,
    /// When the last frame was drawn
    last_frame_tick: Instant,
    /// The durations, in seconds, of the most recent frames
    durations: VecDeque<f64>,
}

impl Screen {
    /// Instantiate for a terminal of the given size.
    pub fn new(config: Config, width: usize, height: usize) -> Result<Self> {
        let scale = config.scale;
        if !(scale.is_finite() && scale > 0.0) {
            bail!("The `scale` setting must be a positive number, got: {scale}");
        }

        let (canvas_width, canvas_height) = Surface::canvas_size_for(width, height);
        let (world_width, world_height) = world_size(canvas_width, canvas_height, scale)?;
        let field = ParticleField::new(world_width, world_height, config.simulation.clone())?;
        let renderer = Renderer::new(&config.simulation, scale);
        let controls = Controls::new(config.mode, config.intensity, config.pointer_timeout());

        Ok(Self {
            config,
            field,
            renderer,
            canvas: Canvas::new(canvas_width, canvas_height),
            controls,
            width,
            height,
            last_frame_tick: Instant::now(),
            durations: VecDeque::with_capacity(FPS_SAMPLES),
        })
    }

    /// Take over the user's terminal and run until told to stop. The terminal is always handed
    /// back in its original state, even when there's an error.
    pub async fn start(
        config: Config,
        protocol_rx: tokio::sync::broadcast::Receiver<Protocol>,
    ) -> Result<()> {
        tracing::debug!("Putting user's terminal into raw mode");
        let mut terminal = Self::get_termwiz_terminal()?;
        terminal.set_raw_mode()?;
        terminal.enter_alternate_screen()?;
        let mut buffered = BufferedTerminal::new(terminal)?;

        let result = Self::run(config, &mut buffered, protocol_rx).await;

        tracing::debug!("Restoring user's terminal");
        let restored = Self::restore(&mut buffered);
        result?;
        restored
    }

    /// We need this just because I can't figure out how to pass `Box<dyn Terminal>` to
    /// `BufferedTerminal::new()`
    fn get_termwiz_terminal() -> Result<impl TermwizTerminal> {
        let capabilities = termwiz::caps::Capabilities::new_from_env()?;
        Ok(termwiz::terminal::new_terminal(capabilities)?)
    }

    /// Show the cursor, leave the alternate screen and go back to cooked mode.
    fn restore<T: TermwizTerminal>(buffered: &mut BufferedTerminal<T>) -> Result<()> {
        buffered.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Visible,
        ));
        buffered.flush()?;
        buffered.terminal().exit_alternate_screen()?;
        buffered.terminal().set_cooked_mode()?;
        Ok(())
    }

    /// The main loop. Frames are drawn at the configured rate, input is handled as soon as it
    /// arrives.
    async fn run<T: TermwizTerminal>(
        config: Config,
        buffered: &mut BufferedTerminal<T>,
        mut protocol_rx: tokio::sync::broadcast::Receiver<Protocol>,
    ) -> Result<()> {
        let (width, height) = buffered.dimensions();
        let mut screen = Self::new(config, width, height)?;
        buffered.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Hidden,
        ));

        tracing::debug!("Starting render loop");
        #[expect(
            clippy::integer_division_remainder_used,
            reason = "`tokio::select! generates this.`"
        )]
        loop {
            tokio::select! {
                () = screen.sleep_until_next_frame_tick() => {
                    screen.handle_resize(buffered)?;
                    screen.frame(buffered)?;
                }
                message = protocol_rx.recv() => {
                    match message {
                        Ok(Protocol::Input(event)) => {
                            if screen.handle_input(&event) == Action::Quit {
                                break;
                            }
                        }
                        Ok(Protocol::End) | Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(count)) => {
                            tracing::warn!("Render loop missed {count} protocol messages");
                        }
                    }
                }
            }
        }
        tracing::debug!("Exited render loop");

        Ok(())
    }

    /// Wait until it's time for the next frame.
    async fn sleep_until_next_frame_tick(&mut self) {
        let interval = self.config.frame_interval();
        if let Some(wait) = interval.checked_sub(self.last_frame_tick.elapsed()) {
            tokio::time::sleep(wait).await;
        }

        let elapsed = self.last_frame_tick.elapsed().as_secs_f64();
        self.durations.push_front(elapsed);
        self.durations.truncate(FPS_SAMPLES);
        self.last_frame_tick = Instant::now();
    }

    /// Handle a single keyboard or mouse event.
    fn handle_input(&mut self, event: &termwiz::input::InputEvent) -> Action {
        let scale = self.config.scale;
        let action = self
            .controls
            .handle_input(event, Instant::now(), |col, row| {
                cell_to_world(scale, col, row)
            });

        if action == Action::Reset {
            self.reset();
        }

        action
    }

    /// Replace all the particles, keeping the canvas size.
    fn reset(&mut self) {
        let bounds = self.field.bounds();
        if let Err(error) = self.field.reset(bounds.width, bounds.height) {
            tracing::error!("Couldn't reset particles: {error:?}");
        }
    }

    /// Check whether the user's terminal has changed size, and if so, start over with a new
    /// population sized to fit.
    fn handle_resize<T: TermwizTerminal>(&mut self, buffered: &mut BufferedTerminal<T>) -> Result<()> {
        let is_resized = buffered.check_for_resize()?;
        if !is_resized {
            return Ok(());
        }

        buffered.repaint()?;
        let (width, height) = buffered.dimensions();
        self.resize(width, height)
    }

    /// Fit the simulation to a new terminal size. When the new size is unusable, say the
    /// terminal has been shrunk to nothing, everything is left as it was.
    fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        tracing::debug!("Terminal resized to {width}x{height}");
        let (canvas_width, canvas_height) = Surface::canvas_size_for(width, height);
        let (world_width, world_height) = world_size(canvas_width, canvas_height, self.config.scale)?;

        if let Err(error) = self.field.reset(world_width, world_height) {
            tracing::warn!("Ignoring resize: {error}");
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.canvas.resize(canvas_width, canvas_height);

        Ok(())
    }

    /// Advance the simulation, if it's playing, and show the result.
    fn frame<T: TermwizTerminal>(&mut self, buffered: &mut BufferedTerminal<T>) -> Result<()> {
        let pointer = self.controls.pointer(Instant::now());
        if self.controls.is_playing {
            self.tick(&pointer);
        }

        let surface = self.draw();
        buffered.draw_from_screen(&surface.surface, 0, 0);
        buffered.flush()?;

        Ok(())
    }

    /// A single step of the simulation, drawn onto the canvas.
    fn tick(&mut self, pointer: &Pointer) {
        let mode = self.controls.mode;
        let intensity = self.controls.intensity;
        if self.config.parallel {
            self.field.step_parallel(pointer, mode, intensity);
        } else {
            self.field.step(pointer, mode, intensity);
        }
        self.renderer.render(
            &mut self.canvas,
            self.field.particles(),
            pointer,
            mode,
            intensity,
        );
    }

    /// The canvas and status line as terminal cells.
    fn draw(&self) -> Surface {
        let mut surface = Surface::new(self.width, self.height);
        surface.add_canvas(&self.canvas);

        if self.config.show_status {
            let halo = self.controls.mode.halo_colour();
            surface.add_text(
                0,
                0,
                &self.status_line(),
                Some(BACKGROUND),
                Some((halo.0, halo.1, halo.2, 1.0)),
            );
        }

        surface
    }

    /// A reminder of the current settings and the keys that change them.
    fn status_line(&self) -> String {
        let state = if self.controls.is_playing {
            "playing"
        } else {
            "paused"
        };
        let fps = self
            .fps()
            .map(|fps| format!(" | {fps:.0} fps"))
            .unwrap_or_default();

        format!(
            " {} | intensity {:.0} | {state}{fps} | 1-5 mode, +/- intensity, space pause, r reset, q quit ",
            self.controls.mode.label(),
            self.controls.intensity,
        )
    }

    /// The average frame rate over the most recent frames.
    fn fps(&self) -> Option<f64> {
        let total: f64 = self.durations.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let count = u32::try_from(self.durations.len()).ok()?;
        Some(f64::from(count) / total)
    }
}

/// The size of simulation space that a canvas of the given size shows.
fn world_size(canvas_width: usize, canvas_height: usize, scale: f64) -> Result<(f64, f64)> {
    let width = f64::from(u32::try_from(canvas_width)?);
    let height = f64::from(u32::try_from(canvas_height)?);
    Ok((width / scale, height / scale))
}

/// The simulation-space point at the centre of a terminal cell. Cells are 1 pixel wide and 2
/// pixels tall.
fn cell_to_world(scale: f64, col: u16, row: u16) -> DVec2 {
    let x = f64::from(col) + 0.5;
    let y = f64::from(row) * 2.0 + 1.0;
    DVec2::new(x, y) / scale
}
