//! Player animation states and their timing table

use serde::{Deserialize, Serialize};

use super::state::Player;

/// Player pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Charging,
    Jumping,
    Falling,
    Landing,
    Dying,
}

/// Per-state timing: ticks per frame and frame count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    pub frame_ticks: u32,
    pub frame_count: u32,
}

impl AnimationState {
    pub const fn timing(self) -> AnimationTiming {
        let (frame_ticks, frame_count) = match self {
            AnimationState::Idle => (60, 1),
            AnimationState::Charging => (8, 1),
            AnimationState::Jumping => (20, 1),
            AnimationState::Falling => (15, 1),
            AnimationState::Landing => (10, 1),
            AnimationState::Dying => (30, 1),
        };
        AnimationTiming {
            frame_ticks,
            frame_count,
        }
    }
}

/// Advance presentation counters by one tick
pub fn advance(player: &mut Player) {
    let timing = player.animation.timing();
    player.animation_ticks = player.animation_ticks.saturating_add(1);
    player.animation_timer += 1;
    if player.animation_timer >= timing.frame_ticks {
        player.animation_frame = (player.animation_frame + 1) % timing.frame_count;
        player.animation_timer = 0;
    }
}
