//! Simulation tick
//!
//! One call advances the run by one tick: physics, event edges, particles,
//! camera, height bookkeeping and section generation.

use super::animation::AnimationState;
use super::intent::ControlIntent;
use super::level::{self, SectionMode};
use super::particles::age_particles;
use super::physics::{safety_reset_due, update_player};
use super::state::{FallSeverity, GameEvent, GameState, Player};
use crate::consts::*;

/// Advance the game state by one tick.
///
/// `dt` is the wall-clock time since the previous tick in seconds. It only
/// feeds `game_time`; all motion constants are per tick.
pub fn step(state: &mut GameState, intent: &ControlIntent, dt: f32) {
    state.events.clear();

    if !state.game_started {
        if intent.wants_start() {
            log::info!("Run started (seed {})", state.seed);
            state.game_started = true;
        }
        return;
    }

    state.time_ticks += 1;
    state.game_time += dt;

    let previous = state.player.clone();
    let outcome = update_player(&previous, &state.platforms, intent, &mut state.rng);
    state.player = outcome.player;
    state.particles.extend(outcome.particles);

    detect_events(&previous, &state.player, &mut state.events);

    age_particles(&mut state.particles);
    follow_player(state);
    update_heights(state);
    maybe_generate_section(state);
}

/// Compare the player before and after physics
fn detect_events(before: &Player, after: &Player, events: &mut Vec<GameEvent>) {
    if safety_reset_due(before) {
        events.push(GameEvent::SafetyReset);
        return;
    }

    let jumped = after.animation == AnimationState::Jumping
        && before.animation != AnimationState::Jumping
        && after.vel.y < 0.0;
    // A tap can start and release a charge within one tick
    if !before.is_charging && (after.is_charging || jumped) {
        events.push(GameEvent::Charge);
    }
    if jumped {
        events.push(GameEvent::Jump);
    }

    if !before.is_grounded && after.is_grounded {
        events.push(GameEvent::Land);
        if let Some(severity) = FallSeverity::classify(after.fall_distance) {
            events.push(GameEvent::Fall(severity));
        }
    }
}

/// Ease the camera toward a point that keeps the player low on screen
fn follow_player(state: &mut GameState) {
    let target_y = state.player.pos.y - VIEWPORT_HEIGHT * CAMERA_ANCHOR;
    state.camera.y += (target_y - state.camera.y) * CAMERA_FOLLOW;
}

fn update_heights(state: &mut GameState) {
    state.current_height = (SEA_LEVEL_Y - state.player.pos.y).max(0.0);
    state.max_height = state.max_height.max(state.current_height);
}

/// Append the next section once the player climbs past the current threshold
fn maybe_generate_section(state: &mut GameState) {
    let threshold = -(state.level_index as f32 * SECTION_HEIGHT);
    if state.player.pos.y >= threshold {
        return;
    }

    state.level_index += 1;
    let mode = SectionMode::for_section(state.level_index);
    let fresh = level::generate_section(threshold, mode, &mut state.rng);

    let cutoff = state.player.pos.y + PRUNE_WINDOW;
    let before = state.platforms.len();
    state.platforms.retain(|p| p.pos.y <= cutoff);
    let pruned = before - state.platforms.len();
    let splice = level::splice_section(&mut state.platforms, fresh);

    log::info!(
        "Section {} generated ({:?}) at y={}, pruned {} platforms, {} active",
        state.level_index,
        mode,
        threshold,
        pruned,
        state.platforms.len()
    );
    if splice != level::Splice::default() {
        log::debug!(
            "Section {} skipped {} slots, displaced {} older platforms",
            state.level_index,
            splice.dropped,
            splice.displaced
        );
    }

    state.events.push(GameEvent::SectionGenerated {
        level_index: state.level_index,
        mode,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Platform;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Started run with the player standing on a single wide floor
    fn standing_state() -> GameState {
        let mut state = GameState::new(12345);
        state.game_started = true;
        state.platforms = vec![Platform::new(0.0, 500.0, 600.0, 50.0)];
        state.player.pos = Vec2::new(300.0, 468.0);
        state.player.is_grounded = true;
        state.player.animation = AnimationState::Idle;
        state.player.last_grounded_y = 468.0;
        state
    }

    fn press(space: bool) -> ControlIntent {
        ControlIntent {
            space_pressed: space,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_gate() {
        let mut state = GameState::new(12345);
        let fresh = serde_json::to_value(&state).unwrap();

        step(&mut state, &ControlIntent::default(), DT);
        assert!(!state.game_started);
        assert_eq!(serde_json::to_value(&state).unwrap(), fresh);

        let right = ControlIntent {
            right: true,
            ..Default::default()
        };
        step(&mut state, &right, DT);
        assert!(state.game_started);
        // The starting tick does nothing else
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, Vec2::new(SPAWN_X, SPAWN_Y));

        step(&mut state, &right, DT);
        assert_eq!(state.time_ticks, 1);
        assert!((state.game_time - DT).abs() < 1e-6);
    }

    #[test]
    fn test_jump_key_starts_run() {
        let mut state = GameState::new(1);
        step(&mut state, &press(true), DT);
        assert!(state.game_started);
    }

    #[test]
    fn test_charge_jump_land_events() {
        let mut state = standing_state();

        step(&mut state, &press(true), DT);
        assert_eq!(state.events, vec![GameEvent::Charge]);

        for _ in 0..10 {
            step(&mut state, &press(true), DT);
            assert!(state.events.is_empty());
        }

        step(&mut state, &press(false), DT);
        assert_eq!(state.events, vec![GameEvent::Jump]);
        assert!(state.player.vel.y < 0.0);

        let mut landed = false;
        for _ in 0..120 {
            step(&mut state, &press(false), DT);
            if state.events.contains(&GameEvent::Land) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(state.player.pos.y, 468.0);
    }

    #[test]
    fn test_tap_within_one_tick_charges_and_jumps() {
        let mut state = standing_state();
        let tap = ControlIntent {
            space_pressed: true,
            space_just_released: true,
            ..Default::default()
        };
        step(&mut state, &tap, DT);
        assert_eq!(state.events, vec![GameEvent::Charge, GameEvent::Jump]);
    }

    #[test]
    fn test_long_fall_emits_severity() {
        let mut state = standing_state();
        state.player.pos.y = 100.0;
        state.player.is_grounded = false;
        state.player.last_grounded_y = 100.0;

        let mut events = Vec::new();
        for _ in 0..120 {
            step(&mut state, &ControlIntent::default(), DT);
            events.extend(state.events.iter().copied());
            if state.player.is_grounded {
                break;
            }
        }
        assert!(events.contains(&GameEvent::Land));
        // Dropped roughly 367 units
        assert!(events.contains(&GameEvent::Fall(FallSeverity::Medium)));
    }

    #[test]
    fn test_safety_reset_event() {
        let mut state = standing_state();
        state.platforms.clear();
        state.player.is_grounded = false;
        state.player.last_grounded_y = 200.0;
        state.player.pos.y = 200.0 + MAX_FALL_BEFORE_RESET + 5.0;

        step(&mut state, &ControlIntent::default(), DT);
        assert_eq!(state.events, vec![GameEvent::SafetyReset]);
        assert_eq!(state.player.pos, Vec2::new(SPAWN_X, 200.0));
    }

    #[test]
    fn test_camera_eases_toward_target() {
        let mut state = standing_state();
        step(&mut state, &ControlIntent::default(), DT);
        let target = 468.0 - VIEWPORT_HEIGHT * CAMERA_ANCHOR;
        assert!((state.camera.y - target * CAMERA_FOLLOW).abs() < 1e-3);

        for _ in 0..200 {
            step(&mut state, &ControlIntent::default(), DT);
        }
        assert!((state.camera.y - target).abs() < 0.5);
    }

    #[test]
    fn test_heights() {
        let mut state = standing_state();
        state.player.pos.y = 268.0;
        state.platforms = vec![Platform::new(0.0, 300.0, 600.0, 50.0)];
        step(&mut state, &ControlIntent::default(), DT);
        assert_eq!(state.current_height, 232.0);
        assert_eq!(state.max_height, 232.0);

        // Below sea level clamps to zero, best is kept
        state.player.pos.y = 900.0;
        state.player.is_grounded = false;
        step(&mut state, &ControlIntent::default(), DT);
        assert_eq!(state.current_height, 0.0);
        assert_eq!(state.max_height, 232.0);
    }

    #[test]
    fn test_section_generated_above_threshold() {
        let mut state = standing_state();
        state.player.pos.y = -10.0;
        state.player.is_grounded = false;
        // Far below the player: pruned
        state.platforms.push(Platform::new(0.0, 2000.0, 100.0, 20.0));

        step(&mut state, &ControlIntent::default(), DT);
        assert_eq!(state.level_index, 1);
        assert_eq!(
            state.events,
            vec![GameEvent::SectionGenerated {
                level_index: 1,
                mode: SectionMode::Pattern(1),
            }]
        );

        let cutoff = state.player.pos.y + PRUNE_WINDOW;
        assert!(state.platforms.iter().all(|p| p.pos.y <= cutoff));
        // Survivor first, then the narrow pattern and its catch platform
        assert_eq!(state.platforms[0].pos.y, 500.0);
        assert_eq!(state.platforms.len(), 1 + 8 + 1);
        let catch = state.platforms.last().unwrap();
        assert_eq!(catch.pos.y, CATCH_OFFSET);
        assert!(catch.pos.y > state.player.bottom());

        // One section per tick; the next threshold is a full section higher
        step(&mut state, &ControlIntent::default(), DT);
        assert_eq!(state.level_index, 1);
    }

    #[test]
    fn test_later_sections_go_procedural() {
        let mut state = standing_state();
        state.level_index = PATTERN_SECTIONS - 1;
        state.player.is_grounded = false;
        state.player.pos.y = -(PATTERN_SECTIONS as f32 - 1.0) * SECTION_HEIGHT - 10.0;

        step(&mut state, &ControlIntent::default(), DT);
        assert_eq!(state.level_index, PATTERN_SECTIONS);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::SectionGenerated {
                mode: SectionMode::Procedural(2),
                ..
            })
        ));
    }

    #[test]
    fn test_live_climb_keeps_platforms_apart() {
        let mut state = GameState::new(2024);
        state.game_started = true;
        for _ in 0..16 {
            let threshold = -(state.level_index as f32 * SECTION_HEIGHT);
            state.player.pos = Vec2::new(SPAWN_X, threshold - 200.0);
            state.player.vel = Vec2::ZERO;
            state.player.is_grounded = false;
            state.player.last_grounded_y = state.player.pos.y;

            let level_before = state.level_index;
            step(&mut state, &ControlIntent::default(), DT);
            assert_eq!(state.level_index, level_before + 1);

            for (i, a) in state.platforms.iter().enumerate() {
                for b in &state.platforms[i + 1..] {
                    assert!(!level::conflicts(a, b), "{:?} cuts into {:?}", a, b);
                }
            }
        }
        assert!(state.level_index > PATTERN_SECTIONS);
    }

    #[test]
    fn test_particles_age_each_tick() {
        let mut state = standing_state();
        state.particles = crate::sim::particles::spawn_landing(&mut state.rng, Vec2::ZERO, 4);
        step(&mut state, &ControlIntent::default(), DT);
        assert!(state.particles.iter().all(|p| p.life == 29));
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |state: &mut GameState| {
            for i in 0..400u32 {
                let intent = ControlIntent {
                    right: i % 90 < 30,
                    left: i % 90 > 60,
                    space_pressed: i % 50 < 35,
                    ..Default::default()
                };
                step(state, &intent, DT);
            }
        };
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        script(&mut a);
        script(&mut b);
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }
}
