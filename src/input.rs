//! Input decoding
//!
//! Device binding happens outside the crate; what arrives here is a stream
//! of `{action, value}` events. Buttons send 1.0 on press and 0.0 on
//! release, analog axes send their position in [-1, 1].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::JOYSTICK_DEAD_ZONE;
use crate::sim::TickInput;

/// Decoded input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Analog stick, horizontal
    AxisX,
    /// Analog stick, vertical (positive is up)
    AxisY,
    Fire,
    /// Toggle pause
    Pause,
    Resume,
    /// Back to the main menu (from pause)
    Menu,
    Start,
    Restart,
    Quit,
    /// Cycle the theme (menu)
    NextTheme,
}

impl Action {
    /// Actions handled by the session controller rather than the ship
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Action::Pause
                | Action::Resume
                | Action::Menu
                | Action::Start
                | Action::Restart
                | Action::Quit
                | Action::NextTheme
        )
    }
}

/// A single input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub action: Action,
    pub value: f32,
}

impl InputEvent {
    pub fn press(action: Action) -> Self {
        Self { action, value: 1.0 }
    }

    pub fn release(action: Action) -> Self {
        Self { action, value: 0.0 }
    }

    pub fn axis(action: Action, value: f32) -> Self {
        Self { action, value }
    }

    pub fn is_press(&self) -> bool {
        self.value > 0.5
    }
}

/// Zero out stick noise and clamp to [-1, 1]
pub fn apply_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if !value.is_finite() || value.abs() < dead_zone {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Held input state accumulated from events
#[derive(Debug, Clone)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    axis: Vec2,
    fire: bool,
    dead_zone: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(JOYSTICK_DEAD_ZONE)
    }
}

impl InputState {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            axis: Vec2::ZERO,
            fire: false,
            dead_zone,
        }
    }

    /// Fold an event into the held state.
    ///
    /// Returns the action if it is a pressed session command, for the
    /// caller to act on.
    pub fn apply(&mut self, event: InputEvent) -> Option<Action> {
        let pressed = event.is_press();
        match event.action {
            Action::MoveUp => self.up = pressed,
            Action::MoveDown => self.down = pressed,
            Action::MoveLeft => self.left = pressed,
            Action::MoveRight => self.right = pressed,
            Action::AxisX => self.axis.x = apply_dead_zone(event.value, self.dead_zone),
            Action::AxisY => self.axis.y = apply_dead_zone(event.value, self.dead_zone),
            Action::Fire => {
                if pressed {
                    self.fire = true;
                }
            }
            command => {
                if pressed {
                    return Some(command);
                }
            }
        }
        None
    }

    /// Current movement direction; held keys override the stick per axis
    pub fn movement(&self) -> Vec2 {
        let x = digital_axis(self.left, self.right).unwrap_or(self.axis.x);
        let y = digital_axis(self.down, self.up).unwrap_or(self.axis.y);
        Vec2::new(x, y)
    }

    /// Build the next tick's input, consuming one-shot actions
    pub fn take_tick_input(&mut self, idle_mode: bool) -> TickInput {
        TickInput {
            movement: self.movement(),
            fire: std::mem::take(&mut self.fire),
            idle_mode,
        }
    }

    /// Forget everything held (new session, back to menu)
    pub fn clear(&mut self) {
        *self = Self::new(self.dead_zone);
    }
}

/// -1/0/1 from a pair of keys, or `None` if neither is held
fn digital_axis(negative: bool, positive: bool) -> Option<f32> {
    match (negative, positive) {
        (false, false) => None,
        (true, false) => Some(-1.0),
        (false, true) => Some(1.0),
        (true, true) => Some(0.0),
    }
}
