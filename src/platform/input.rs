//! Input latching
//!
//! Device callbacks fire between ticks in any order. The latch keeps held
//! state per source and remembers edges until the next tick samples them, so
//! a jump release or a quick tap is never lost.

use crate::sim::ControlIntent;

/// A logical control, whatever device it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    /// Keyboard jump
    Jump,
    /// On-screen jump zone (touch or mouse)
    TouchJump,
}

impl Button {
    /// Map a `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Button::Left),
            "ArrowRight" | "KeyD" => Some(Button::Right),
            "Space" => Some(Button::Jump),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    left: bool,
    right: bool,
    jump_key: bool,
    touch_jump: bool,
    /// Jump went down since the last snapshot
    jump_tapped: bool,
    /// Jump went up since the last snapshot
    jump_released: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Either jump source is down
    pub fn jump_held(&self) -> bool {
        self.jump_key || self.touch_jump
    }

    /// Press a button. Repeats of an already held button are ignored.
    pub fn press(&mut self, button: Button) {
        let was_jumping = self.jump_held();
        let slot = self.slot(button);
        if *slot {
            return;
        }
        *slot = true;
        if !was_jumping && self.jump_held() {
            self.jump_tapped = true;
        }
    }

    pub fn release(&mut self, button: Button) {
        let was_jumping = self.jump_held();
        let slot = self.slot(button);
        if !*slot {
            return;
        }
        *slot = false;
        if was_jumping && !self.jump_held() {
            self.jump_released = true;
        }
    }

    /// Let go of everything, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        for button in [Button::Left, Button::Right, Button::Jump, Button::TouchJump] {
            self.release(button);
        }
    }

    /// Sample the intent for one tick and consume the latched edges
    pub fn snapshot(&mut self) -> ControlIntent {
        let intent = ControlIntent {
            left: self.left,
            right: self.right,
            charging: self.touch_jump,
            space_pressed: self.jump_held() || self.jump_tapped,
            space_just_released: self.jump_released,
        };
        self.jump_tapped = false;
        self.jump_released = false;
        intent
    }

    /// Forget all held state and pending edges
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Jump => &mut self.jump_key,
            Button::TouchJump => &mut self.touch_jump,
        }
    }
}
