//! Keyboard state for [`Game::update`](crate::app::Game::update).
//!
//! The game loop feeds winit key events in as they arrive and clears the
//! per-frame edges after each update, so during `update`:
//!
//! - [`Input::is_down`] is true for every key currently held,
//! - [`Input::just_pressed`] is true only on the first frame of a press.

use std::collections::HashSet;

pub use winit::keyboard::KeyCode;

/// Held keys plus the keys that went down since the last update.
#[derive(Debug, Clone, Default)]
pub struct Input {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// `-1.0` while only `negative` is held, `1.0` while only `positive` is,
    /// `0.0` otherwise.
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_down(negative) {
            value -= 1.0;
        }
        if self.is_down(positive) {
            value += 1.0;
        }
        value
    }

    /// Key repeat events don't count as new presses.
    pub(crate) fn press(&mut self, key: KeyCode) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub(crate) fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Forget this frame's presses. Held keys stay held.
    pub(crate) fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Drop everything, e.g. when the window loses focus and release events
    /// would be missed.
    pub(crate) fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}
