//! Visual effect particles
//!
//! Spawners build batches from the run RNG; `age_particles` is the only
//! place particles move.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleBatch, Rgba};
use crate::consts::PARTICLE_GRAVITY;

const LANDING_COLOR: Rgba = Rgba::rgb(0x94, 0xa3, 0xb8);
const DEATH_RED: Rgba = Rgba::rgb(0xef, 0x44, 0x44);
const DEATH_AMBER: Rgba = Rgba::rgb(0xf5, 0x9e, 0x0b);

/// Dust count for an ordinary landing
pub const LANDING_PARTICLES: usize = 8;
/// Chance per charging tick that a burst spawns
pub const CHARGE_SPAWN_CHANCE: f64 = 0.3;

/// Symmetric random value in `[-half, half)`
#[inline]
fn spread<R: Rng>(rng: &mut R, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * half
}

/// Dust kicked up under the player's feet
pub fn spawn_landing<R: Rng>(rng: &mut R, at: Vec2, count: usize) -> ParticleBatch {
    (0..count)
        .map(|_| Particle {
            pos: Vec2::new(at.x + rng.random::<f32>() * 32.0, at.y + 32.0),
            vel: Vec2::new(spread(&mut *rng, 2.0), -rng.random::<f32>() * 3.0 - 1.0),
            life: 30,
            max_life: 30,
            color: LANDING_COLOR,
            size: rng.random::<f32>() * 3.0 + 1.0,
        })
        .collect()
}

/// Red/amber burst for a punishing fall
pub fn spawn_death<R: Rng>(rng: &mut R, at: Vec2, count: usize) -> ParticleBatch {
    (0..count)
        .map(|_| Particle {
            pos: at + Vec2::splat(16.0),
            vel: Vec2::new(spread(&mut *rng, 3.0), -rng.random::<f32>() * 4.0 - 2.0),
            life: 60,
            max_life: 60,
            color: if rng.random_bool(0.5) { DEATH_RED } else { DEATH_AMBER },
            size: rng.random::<f32>() * 4.0 + 2.0,
        })
        .collect()
}

/// Sparks while charging; hue shifts green to yellow as the charge fills.
/// Most ticks spawn nothing.
pub fn spawn_charge<R: Rng>(rng: &mut R, at: Vec2, charge_ratio: f32) -> ParticleBatch {
    if !rng.random_bool(CHARGE_SPAWN_CHANCE) {
        return ParticleBatch::new();
    }

    let count = (charge_ratio * 3.0).floor() as usize + 1;
    let color = Rgba::from_hsl(120.0 - charge_ratio * 60.0, 0.7, 0.6);
    (0..count)
        .map(|_| Particle {
            pos: Vec2::new(
                at.x + rng.random::<f32>() * 32.0,
                at.y + rng.random::<f32>() * 32.0,
            ),
            vel: Vec2::new(spread(&mut *rng, 1.0), -rng.random::<f32>() * 2.0 - 0.5),
            life: 20,
            max_life: 20,
            color,
            size: rng.random::<f32>() * 2.0 + 1.0,
        })
        .collect()
}

/// Move, accelerate and expire particles by one tick
pub fn age_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= 1;
    }
    particles.retain(|p| p.life > 0);
}
