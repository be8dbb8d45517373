//! Charge Climb - a charge-and-release vertical platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level generation, game state)
//! - `audio`: Sound effect routing and the Web Audio backend
//! - `platform`: Input latching and the per-frame session driver
//! - `settings`: Player preferences
//! - `hud`: Derived HUD values

pub mod audio;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod sim;

pub use hud::HudSnapshot;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// All physics values are per tick and tuned for a nominal 60 ticks/second.
/// They are not scaled by the frame delta.
pub mod consts {
    /// Downward acceleration added to airborne velocity each tick
    pub const GRAVITY: f32 = 0.8;
    /// Ground velocity multiplier when no direction is held
    pub const FRICTION: f32 = 0.85;
    /// Airborne velocity multiplier (no air control)
    pub const AIR_DRAG: f32 = 0.98;
    /// Horizontal speed while a direction is held on the ground
    pub const MOVE_SPEED: f32 = 3.0;

    /// Jump speed for an uncharged release
    pub const MIN_CHARGE_JUMP: f32 = 5.0;
    /// Jump speed for a fully charged release
    pub const MAX_CHARGE_JUMP: f32 = 18.0;
    /// Ticks needed to reach full charge (1 second at 60 Hz)
    pub const MAX_CHARGE_TICKS: u32 = 60;

    /// Falls longer than this trigger the punishment effect
    pub const FALL_PUNISHMENT_DISTANCE: f32 = 400.0;
    /// Falling this far below the last safe landing teleports the player back
    pub const MAX_FALL_BEFORE_RESET: f32 = 1200.0;

    /// Player bounding box
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    /// Spawn and safety-reset column
    pub const SPAWN_X: f32 = 300.0;
    pub const SPAWN_Y: f32 = 400.0;

    /// Below this horizontal speed a grounded player can settle to idle
    pub const IDLE_SPEED_EPSILON: f32 = 0.5;
    /// Ticks the landing pose is held; it settles on the tick after
    pub const LANDING_HOLD_TICKS: u32 = 20;
    /// Tolerance for treating touching boxes as resting contact
    pub const CONTACT_EPSILON: f32 = 0.01;

    /// Logical viewport
    pub const VIEWPORT_WIDTH: f32 = 600.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;

    /// Height zero reference (y of the first section's start line)
    pub const SEA_LEVEL_Y: f32 = 500.0;
    /// Vertical distance between section generation thresholds
    pub const SECTION_HEIGHT: f32 = 800.0;
    /// Number of hand-authored sections before procedural generation
    pub const PATTERN_SECTIONS: u32 = 8;
    /// Procedural difficulty cap
    pub const MAX_DIFFICULTY: u32 = 10;
    /// Platforms further below the player than this are pruned
    pub const PRUNE_WINDOW: f32 = 2.0 * VIEWPORT_HEIGHT;

    /// Catch platform laid under every generated section
    pub const CATCH_OFFSET: f32 = 50.0;
    pub const CATCH_WIDTH: f32 = 600.0;
    pub const CATCH_HEIGHT: f32 = 50.0;
    /// Thickness of regular platforms
    pub const PLATFORM_THICKNESS: f32 = 20.0;

    /// Camera smoothing factor per tick
    pub const CAMERA_FOLLOW: f32 = 0.1;
    /// Player sits this far down the viewport when the camera is settled
    pub const CAMERA_ANCHOR: f32 = 0.7;

    /// Downward acceleration applied to particles
    pub const PARTICLE_GRAVITY: f32 = 0.1;

    /// Raw units per displayed meter
    pub const UNITS_PER_METER: f32 = 10.0;

    /// Longest frame delta credited to the run clock (seconds), so a
    /// backgrounded tab does not jump the timer
    pub const MAX_FRAME_DT: f32 = 0.25;
}

/// Convert raw height units to whole displayed meters (never negative)
#[inline]
pub fn meters(units: f32) -> u32 {
    (units / consts::UNITS_PER_METER).floor().max(0.0) as u32
}

/// Format elapsed seconds as `mm:ss`
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
