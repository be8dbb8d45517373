//! HUD values derived from the game state

use serde::Serialize;

use crate::sim::GameState;
use crate::{format_clock, meters};

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub height_m: u32,
    pub best_m: u32,
    /// `mm:ss`
    pub clock: String,
    /// 1-based section number
    pub section: u32,
    /// Jump meter fill in `[0, 1]`
    pub charge_ratio: f32,
    pub started: bool,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            height_m: meters(state.current_height),
            best_m: meters(state.max_height),
            clock: format_clock(state.game_time),
            section: state.level_index + 1,
            charge_ratio: state.player.charge_ratio(),
            started: state.game_started,
        }
    }
}
