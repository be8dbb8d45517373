//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Per-tick constants only (wall-clock time is bookkeeping)
//! - Seeded RNG only
//! - Platforms resolved in generation order
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod intent;
pub mod level;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use animation::AnimationState;
pub use intent::ControlIntent;
pub use level::SectionMode;
pub use physics::{PhysicsOutcome, update_player};
pub use state::{
    Camera, FallSeverity, GameEvent, GameState, Particle, ParticleBatch, Platform, PlatformKind,
    Player, Rgba,
};
pub use tick::step;
