//! Platform-agnostic input.
//!
//! The window layer pushes events in through the `*_event` / `*_moved` methods; the
//! session reads one frame's worth back out. [`Input::start_frame`] drops everything
//! that only lasts a frame.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keyboard keys the vignette binds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    C,
    K,
    R,
    Key1,
    Key2,
    Key3,
    Key4,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    Space,
    Enter,
    Escape,
}

/// Pointer buttons the camera and picking react to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Held state plus this frame's edges and motion.
#[derive(Debug, Clone, Default)]
pub struct Input {
    held_keys: FxHashSet<Key>,
    /// Keys that went down this frame, in press order. Auto-repeat never lands here.
    keys_down: Vec<Key>,
    held_buttons: FxHashSet<MouseButton>,

    pointer: Option<Vec2>,
    drag: Vec2,
    scroll: Vec2,
    /// Primary presses (left clicks and touch starts) this frame, in window pixels.
    taps: Vec<Vec2>,

    screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_frame(&mut self) {
        self.keys_down.clear();
        self.drag = Vec2::ZERO;
        self.scroll = Vec2::ZERO;
        self.taps.clear();
    }

    // ========================================================================
    // Event intake
    // ========================================================================

    pub fn key_event(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed if self.held_keys.insert(key) => self.keys_down.push(key),
            ButtonState::Pressed => {}
            ButtonState::Released => {
                self.held_keys.remove(&key);
            }
        }
    }

    pub fn button_event(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                let fresh = self.held_buttons.insert(button);
                if fresh
                    && button == MouseButton::Left
                    && let Some(at) = self.pointer
                {
                    self.taps.push(at);
                }
            }
            ButtonState::Released => {
                self.held_buttons.remove(&button);
            }
        }
    }

    /// The first position after startup only places the pointer; later ones accumulate drag.
    pub fn pointer_moved(&mut self, at: Vec2) {
        if let Some(previous) = self.pointer {
            self.drag += at - previous;
        }
        self.pointer = Some(at);
    }

    /// A touch start is a primary press at the touch point, without drag.
    pub fn touch_started(&mut self, at: Vec2) {
        self.pointer = Some(at);
        self.taps.push(at);
    }

    pub fn scrolled(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn is_key_held(&self, key: Key) -> bool {
        self.held_keys.contains(&key)
    }

    #[must_use]
    pub fn keys_down(&self) -> &[Key] {
        &self.keys_down
    }

    #[must_use]
    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }

    #[must_use]
    pub fn taps(&self) -> &[Vec2] {
        &self.taps
    }

    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Pointer travel this frame, in pixels.
    #[must_use]
    pub fn drag(&self) -> Vec2 {
        self.drag
    }

    /// Wheel travel this frame, in lines.
    #[must_use]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}
