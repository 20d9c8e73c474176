//! Player input latched between ticks.
//!
//! Inputs arrive asynchronously (pointer events, key presses) but are only
//! applied at the start of the next [`GameSession::tick`](crate::session::GameSession::tick),
//! in arrival order. The [`InputQueue`] is the buffer in between.

use flappy_core::config::GameConfig;
use serde::{Deserialize, Serialize};

/// A single player action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionInput {
    /// Leave the ready screen.
    Start,
    /// Flap the wings.
    Flap,
    /// Tap on the result screen at logical canvas coordinates.
    Restart { x: f64, y: f64 },
}

/// FIFO buffer of inputs waiting for the next tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputQueue {
    pending: Vec<SessionInput>,
}

impl InputQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input behind everything already pending.
    pub fn push(&mut self, input: SessionInput) {
        self.pending.push(input);
    }

    /// Inputs in arrival order.
    pub fn pending(&self) -> &[SessionInput] {
        &self.pending
    }

    /// Number of pending inputs.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every pending input, oldest first.
    pub fn take(&mut self) -> Vec<SessionInput> {
        std::mem::take(&mut self.pending)
    }

    /// Drop every pending input.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Replace the queue contents with `inputs`.
    pub fn replace(&mut self, inputs: &[SessionInput]) {
        self.pending.clear();
        self.pending.extend_from_slice(inputs);
    }
}

/// Map a pointer position on the displayed element to logical canvas
/// coordinates.
///
/// `offset_x`/`offset_y` are relative to the element's top-left corner and
/// `client_width`/`client_height` are its displayed size. Returns `None` when
/// the element has no area.
pub fn normalize_pointer(
    config: &GameConfig,
    offset_x: f64,
    offset_y: f64,
    client_width: f64,
    client_height: f64,
) -> Option<(f64, f64)> {
    if !(client_width > 0.0 && client_height > 0.0) {
        return None;
    }
    Some((
        offset_x / client_width * config.canvas_width,
        offset_y / client_height * config.canvas_height,
    ))
}
