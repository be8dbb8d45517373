//! Player physics for one tick
//!
//! Order per tick: safety reset, animation counters, gravity, charge-jump
//! state machine, horizontal control, integration, fall tracking, collision.
//! The input player is left untouched; the next player and any particles
//! spawned along the way are returned together.

use rand::Rng;

use super::animation::{self, AnimationState};
use super::collision::resolve_collisions;
use super::intent::ControlIntent;
use super::particles::{self, LANDING_PARTICLES};
use super::state::{ParticleBatch, Platform, Player};
use crate::consts::*;

/// Result of advancing the player by one tick
#[derive(Debug, Clone)]
pub struct PhysicsOutcome {
    pub player: Player,
    pub particles: ParticleBatch,
}

/// Upward launch speed for a charge ratio in `[0, 1]`
#[inline]
pub fn jump_power(charge_ratio: f32) -> f32 {
    MIN_CHARGE_JUMP + (MAX_CHARGE_JUMP - MIN_CHARGE_JUMP) * charge_ratio
}

/// Player has dropped far enough below the last safe landing to be teleported
#[inline]
pub fn safety_reset_due(player: &Player) -> bool {
    player.pos.y > player.last_grounded_y + MAX_FALL_BEFORE_RESET
}

/// Advance the player by one tick against the given platforms
pub fn update_player<R: Rng>(
    player: &Player,
    platforms: &[Platform],
    intent: &ControlIntent,
    rng: &mut R,
) -> PhysicsOutcome {
    let mut player = player.clone();
    let mut particles = ParticleBatch::new();

    if safety_reset_due(&player) {
        reset_to_last_safe(&mut player);
        return PhysicsOutcome { player, particles };
    }

    animation::advance(&mut player);

    if !player.is_grounded {
        player.vel.y += GRAVITY;
    }

    particles.extend(update_charge(&mut player, intent, rng));
    apply_horizontal(&mut player, intent);

    player.pos += player.vel;

    if !player.is_grounded && player.vel.y > 0.0 && !player.is_falling {
        player.is_falling = true;
        player.fall_start_y = player.pos.y;
        player.fall_distance = 0.0;
    }

    let resolution = resolve_collisions(&mut player, platforms);

    if let Some(distance) = resolution.fall_distance {
        if distance > FALL_PUNISHMENT_DISTANCE {
            let count = (distance / 50.0).floor() as usize;
            log::debug!("Punishing fall of {:.0} units", distance);
            particles.extend(particles::spawn_death(rng, player.pos, count));
        }
    }

    if resolution.touched_down() {
        player.set_animation(AnimationState::Landing);
        particles.extend(particles::spawn_landing(rng, player.pos, LANDING_PARTICLES));
    }

    settle_idle(&mut player);

    PhysicsOutcome { player, particles }
}

/// Teleport back above the last safe landing with all motion cleared
fn reset_to_last_safe(player: &mut Player) {
    log::info!(
        "Safety reset: y={:.0} last safe y={:.0}",
        player.pos.y,
        player.last_grounded_y
    );
    player.pos.x = SPAWN_X;
    player.pos.y = player.last_grounded_y;
    player.vel = glam::Vec2::ZERO;
    player.is_grounded = false;
    player.is_falling = false;
    player.fall_distance = 0.0;
    player.set_animation(AnimationState::Falling);
}

/// Charge-jump state machine: idle -> charging -> released
fn update_charge<R: Rng>(player: &mut Player, intent: &ControlIntent, rng: &mut R) -> ParticleBatch {
    if intent.space_pressed && player.is_grounded && !player.is_charging {
        player.is_charging = true;
        player.charge_time = 0;
        player.set_animation(AnimationState::Charging);
    }

    let mut sparks = ParticleBatch::new();
    if player.is_charging && intent.space_pressed && player.is_grounded {
        player.charge_time = (player.charge_time + 1).min(player.max_charge_time);
        sparks = particles::spawn_charge(rng, player.pos, player.charge_ratio());
    }

    if player.is_charging && intent.released() {
        player.vel.y = -jump_power(player.charge_ratio());
        player.is_charging = false;
        player.charge_time = 0;
        player.is_grounded = false;
        player.set_animation(AnimationState::Jumping);
    }

    sparks
}

/// Direct control on the ground (or mid-charge), drag only in the air
fn apply_horizontal(player: &mut Player, intent: &ControlIntent) {
    if player.is_grounded || player.is_charging {
        if intent.left {
            player.vel.x = -MOVE_SPEED;
        } else if intent.right {
            player.vel.x = MOVE_SPEED;
        } else {
            player.vel.x *= FRICTION;
        }
    } else {
        player.vel.x *= AIR_DRAG;
        if player.vel.y > 0.0 && player.animation != AnimationState::Falling {
            player.set_animation(AnimationState::Falling);
        }
    }
}

/// Grounded and nearly still: drop back to idle once any landing pose has been held
fn settle_idle(player: &mut Player) {
    if !player.is_grounded || player.is_charging || player.vel.x.abs() >= IDLE_SPEED_EPSILON {
        return;
    }
    match player.animation {
        AnimationState::Landing if player.animation_ticks > LANDING_HOLD_TICKS => {
            player.set_animation(AnimationState::Idle);
        }
        AnimationState::Landing | AnimationState::Idle => {}
        _ => player.set_animation(AnimationState::Idle),
    }
}
