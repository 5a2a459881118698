//! Keyboard and touch input
//!
//! Keyboard state is a set of held key names; the simulation reads it once
//! per tick. Touch drags place the car directly under the finger.

use std::collections::HashSet;

use crate::consts::CANVAS_WIDTH;
use crate::sim::TickInput;

/// Keys the game reacts to, by `KeyboardEvent.key` value
pub mod keys {
    pub const LEFT: [&str; 2] = ["ArrowLeft", "a"];
    pub const RIGHT: [&str; 2] = ["ArrowRight", "d"];
    pub const PAUSE: &str = "Escape";
}

/// One-shot actions raised by key releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Escape: pause while playing, resume while paused
    TogglePause,
}

/// Keyboard and touch state shared between event handlers and the loop
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    /// Last touch position (client coordinates)
    pub touch_x: Option<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) -> Option<InputCommand> {
        self.held.remove(key);
        (key == keys::PAUSE).then_some(InputCommand::TogglePause)
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Steering for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            steer_left: keys::LEFT.iter().any(|k| self.is_held(k)),
            steer_right: keys::RIGHT.iter().any(|k| self.is_held(k)),
        }
    }

    /// Forget everything held (focus loss, teardown)
    pub fn clear(&mut self) {
        self.held.clear();
        self.touch_x = None;
    }
}

/// Map a touch's client x onto the logical canvas.
///
/// `rect_left` and `rect_width` are the canvas' on-screen bounds; the canvas
/// is stretched to fit, so the client offset is rescaled to logical units.
pub fn touch_to_canvas_x(client_x: f32, rect_left: f32, rect_width: f32) -> Option<f32> {
    if rect_width <= 0.0 || !rect_width.is_finite() {
        return None;
    }
    let scale = CANVAS_WIDTH / rect_width;
    Some((client_x - rect_left) * scale)
}
