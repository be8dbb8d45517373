//! Game state and core simulation types
//!
//! Everything the render and HUD collaborators read lives here. The
//! orchestrator in `tick` is the only writer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::AnimationState;
use super::level::{self, SectionMode};
use crate::consts::*;

/// The climbing character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (y grows downward)
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub is_grounded: bool,
    pub is_charging: bool,
    /// Ticks spent charging, always within `0..=max_charge_time`
    pub charge_time: u32,
    pub max_charge_time: u32,
    pub animation: AnimationState,
    /// Presentation counters
    pub animation_frame: u32,
    pub animation_timer: u32,
    /// Ticks since `animation` last changed
    pub animation_ticks: u32,
    pub is_falling: bool,
    /// y at the moment the current fall began
    pub fall_start_y: f32,
    /// Distance descended by the last tracked fall; zeroed at fall onset
    pub fall_distance: f32,
    /// Highest (smallest y) landing so far, used as the respawn anchor
    pub last_grounded_y: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(SPAWN_X, SPAWN_Y),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            is_grounded: false,
            is_charging: false,
            charge_time: 0,
            max_charge_time: MAX_CHARGE_TICKS,
            animation: AnimationState::Falling,
            animation_frame: 0,
            animation_timer: 0,
            animation_ticks: 0,
            is_falling: false,
            fall_start_y: SPAWN_Y,
            fall_distance: 0.0,
            last_grounded_y: SPAWN_Y,
        }
    }
}

impl Player {
    /// Charge progress in `[0, 1]`
    #[inline]
    pub fn charge_ratio(&self) -> f32 {
        self.charge_time as f32 / self.max_charge_time as f32
    }

    /// Switch animation state, restarting the presentation counters on change
    pub fn set_animation(&mut self, animation: AnimationState) {
        if self.animation != animation {
            self.animation = animation;
            self.animation_frame = 0;
            self.animation_timer = 0;
            self.animation_ticks = 0;
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Platform behaviour tag. Only `Normal` has behaviour; the rest are reserved
/// and collide like `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    Breakable,
    Moving,
}

/// A static rectangle the player can stand on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            kind: PlatformKind::Normal,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict box intersection; shared edges do not count
    pub fn overlaps(&self, other: &Platform) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Packed `0xRRGGBBAA` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xff)
    }

    pub fn channels(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Build from HSL with `hue` in degrees and `saturation`/`lightness` in `[0, 1]`
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let h = hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_byte = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(to_byte(r), to_byte(g), to_byte(b))
    }

    /// CSS color string for canvas renderers
    pub fn css(self, alpha: f32) -> String {
        let [r, g, b, _] = self.channels();
        format!("rgba({}, {}, {}, {:.3})", r, g, b, alpha.clamp(0.0, 1.0))
    }
}

/// A short-lived visual effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: i32,
    pub max_life: i32,
    pub color: Rgba,
    pub size: f32,
}

impl Particle {
    /// Fade factor for renderers
    pub fn alpha(&self) -> f32 {
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }
}

/// Particles emitted during one tick
pub type ParticleBatch = Vec<Particle>;

/// Render offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

/// How hard a landing was, for audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FallSeverity {
    Small,
    Medium,
    Big,
}

impl FallSeverity {
    /// Classify a landing's fall distance; short drops map to `None`
    pub fn classify(fall_distance: f32) -> Option<Self> {
        if fall_distance > 500.0 {
            Some(FallSeverity::Big)
        } else if fall_distance > 300.0 {
            Some(FallSeverity::Medium)
        } else if fall_distance > 150.0 {
            Some(FallSeverity::Small)
        } else {
            None
        }
    }
}

/// Discrete things that happened during a tick, derived by comparing the
/// player before and after physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Charging began
    Charge,
    /// A charge was released into an upward jump
    Jump,
    /// Grounded went false -> true
    Land,
    /// The landing ended a fall long enough to be heard
    Fall(FallSeverity),
    /// Catastrophic fall, player teleported to the last safe landing
    SafetyReset,
    /// A new section was appended
    SectionGenerated { level_index: u32, mode: SectionMode },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Serialized with the snapshot so a restored run continues the same stream
    pub(crate) rng: Pcg32,
    pub player: Player,
    /// Active platforms in generation order
    pub platforms: Vec<Platform>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub camera: Camera,
    pub game_started: bool,
    /// Elapsed seconds since the run started
    pub game_time: f32,
    pub current_height: f32,
    pub max_height: f32,
    /// Number of sections generated after the first
    pub level_index: u32,
    /// Simulated ticks since start
    pub time_ticks: u64,
    /// Events of the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let platforms = level::generate_section(SEA_LEVEL_Y, SectionMode::Pattern(0), &mut rng);

        Self {
            seed,
            rng,
            player: Player::default(),
            platforms,
            particles: Vec::new(),
            camera: Camera::default(),
            game_started: false,
            game_time: 0.0,
            current_height: 0.0,
            max_height: 0.0,
            level_index: 0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }
}
