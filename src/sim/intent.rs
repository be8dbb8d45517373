//! Control intent sampled once per tick

use serde::{Deserialize, Serialize};

/// What the player is asking for this tick. Produced by the input layer,
/// read-only to the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlIntent {
    pub left: bool,
    pub right: bool,
    /// Touch jump zone held
    pub charging: bool,
    /// Jump key or zone held
    pub space_pressed: bool,
    /// Jump was let go since the previous tick
    pub space_just_released: bool,
}

impl ControlIntent {
    /// Any input that starts a run
    pub fn wants_start(&self) -> bool {
        self.left || self.right || self.charging || self.space_pressed
    }

    /// Single release edge: the explicit release flag or the jump no longer
    /// being held. Only meaningful while a charge is in progress.
    #[inline]
    pub fn released(&self) -> bool {
        self.space_just_released || !self.space_pressed
    }
}
