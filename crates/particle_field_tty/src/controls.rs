//! Turn keyboard and mouse input into changes to the simulation's controls.

use std::time::{Duration, Instant};

use glam::DVec2;
use particle_field::simulation::{MAX_INTENSITY, MIN_INTENSITY};
use particle_field::{Mode, Pointer};
use termwiz::input::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseEvent};

/// How much a single key press changes the intensity.
const INTENSITY_STEP: f64 = 5.0;

/// What the driver needs to do, beyond updating the controls, in response to some input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Nothing else to do
    None,
    /// Replace all the particles with fresh ones
    Reset,
    /// Exit the application
    Quit,
}

/// Everything the user can change while the simulation runs.
#[derive(Debug, Clone)]
pub(crate) struct Controls {
    /// The current shape of the force field
    pub mode: Mode,
    /// The current size of the pointer's influence, in `20.0..=100.0`
    pub intensity: f64,
    /// Paused simulations neither step nor draw
    pub is_playing: bool,
    /// The last known pointer position, in simulation space
    pointer_position: DVec2,
    /// When the last mouse event arrived
    last_mouse_event: Option<Instant>,
    /// How long the pointer stays active without mouse events
    pointer_timeout: Duration,
}

impl Controls {
    /// Instantiate.
    pub fn new(mode: Mode, intensity: f64, pointer_timeout: Duration) -> Self {
        Self {
            mode,
            intensity: clamp_intensity(intensity),
            is_playing: true,
            pointer_position: DVec2::ZERO,
            last_mouse_event: None,
            pointer_timeout,
        }
    }

    /// React to a single input event. `cell_to_world` converts a terminal cell's column and row
    /// into simulation space.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        now: Instant,
        cell_to_world: impl Fn(u16, u16) -> DVec2,
    ) -> Action {
        #[expect(
            clippy::wildcard_enum_match_arm,
            reason = "We only react to keys and the mouse"
        )]
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => {
                self.handle_mouse(mouse, now, cell_to_world);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// The pointer as the simulation should see it at the given moment.
    pub fn pointer(&self, now: Instant) -> Pointer {
        let is_active = self.last_mouse_event.is_some_and(|last| {
            now.saturating_duration_since(last) < self.pointer_timeout
        });
        Pointer::new(self.pointer_position.x, self.pointer_position.y, is_active)
    }

    /// Mode selection, intensity, play/pause, reset and quitting.
    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        let is_ctrl = key.modifiers.contains(Modifiers::CTRL);

        #[expect(
            clippy::wildcard_enum_match_arm,
            reason = "Most keys don't do anything"
        )]
        match key.key {
            KeyCode::Char('c' | 'C') if is_ctrl => return Action::Quit,
            KeyCode::Char('q' | 'Q') | KeyCode::Escape => return Action::Quit,
            KeyCode::Char(digit @ '1'..='5') => {
                let maybe_mode = digit
                    .to_digit(10)
                    .and_then(|number| usize::try_from(number).ok())
                    .and_then(|number| Mode::ALL.get(number.saturating_sub(1)));
                if let Some(mode) = maybe_mode {
                    self.set_mode(*mode);
                }
            }
            KeyCode::Char('m') | KeyCode::Tab => self.set_mode(self.mode.next()),
            KeyCode::Char('M') => self.set_mode(self.mode.previous()),
            KeyCode::Char('+' | '=') | KeyCode::UpArrow => {
                self.change_intensity(INTENSITY_STEP);
            }
            KeyCode::Char('-' | '_') | KeyCode::DownArrow => {
                self.change_intensity(-INTENSITY_STEP);
            }
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                tracing::debug!("Playing: {}", self.is_playing);
            }
            KeyCode::Char('r' | 'R') => return Action::Reset,
            _ => (),
        }

        Action::None
    }

    /// Any mouse event, even without buttons pressed, moves the pointer.
    fn handle_mouse(
        &mut self,
        mouse: &MouseEvent,
        now: Instant,
        cell_to_world: impl Fn(u16, u16) -> DVec2,
    ) {
        // Terminal mouse coordinates are 1-based.
        let col = mouse.x.saturating_sub(1);
        let row = mouse.y.saturating_sub(1);
        self.pointer_position = cell_to_world(col, row);
        self.last_mouse_event = Some(now);
    }

    /// Switch force-field mode.
    fn set_mode(&mut self, mode: Mode) {
        tracing::debug!("Switching mode to: {mode}");
        self.mode = mode;
    }

    /// Nudge the intensity, keeping it in range.
    fn change_intensity(&mut self, delta: f64) {
        self.intensity = clamp_intensity(self.intensity + delta);
        tracing::debug!("Intensity now: {}", self.intensity);
    }
}

/// Keep an intensity in the range the simulation expects.
fn clamp_intensity(intensity: f64) -> f64 {
    if intensity.is_nan() {
        return MIN_INTENSITY;
    }
    intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)
}
