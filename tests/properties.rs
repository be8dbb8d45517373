//! Invariants over arbitrary input sequences

use charge_climb::consts::*;
use charge_climb::platform::{Button, InputLatch};
use charge_climb::sim::level::{self, SectionMode};
use charge_climb::sim::particles;
use charge_climb::sim::{self, ControlIntent, GameState};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const DT: f32 = 1.0 / 60.0;

/// Held buttons for one tick, one bit per button
fn apply_mask(latch: &mut InputLatch, mask: u8) {
    for (bit, button) in [Button::Left, Button::Right, Button::Jump, Button::TouchJump]
        .into_iter()
        .enumerate()
    {
        if mask & (1 << bit) != 0 {
            latch.press(button);
        } else {
            latch.release(button);
        }
    }
}

/// Runs of the same mask, so charges get time to build
fn input_runs() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..16, 1u8..80), 1..40)
}

fn intents(runs: &[(u8, u8)]) -> Vec<ControlIntent> {
    let mut latch = InputLatch::new();
    let mut out = Vec::new();
    for &(mask, len) in runs {
        for _ in 0..len {
            apply_mask(&mut latch, mask);
            out.push(latch.snapshot());
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_tick_invariants(seed in any::<u64>(), runs in input_runs()) {
        let mut state = GameState::new(seed);

        for intent in intents(&runs) {
            let before = state.player.clone();
            let level_before = state.level_index;
            sim::step(&mut state, &intent, DT);
            let after = &state.player;

            prop_assert!(after.charge_time <= after.max_charge_time);
            // Charge only drops back to zero
            if after.charge_time < before.charge_time {
                prop_assert_eq!(after.charge_time, 0);
            }

            prop_assert!(after.last_grounded_y <= before.last_grounded_y);

            if after.is_grounded {
                prop_assert_eq!(after.vel.y, 0.0);
            }

            prop_assert!(state.level_index >= level_before);
            prop_assert!(state.level_index - level_before <= 1);
            prop_assert!(state.max_height >= state.current_height);

            for particle in &state.particles {
                prop_assert!(particle.life > 0);
                prop_assert!(particle.life < particle.max_life);
            }
        }
    }

    #[test]
    fn test_same_inputs_same_run(seed in any::<u64>(), runs in input_runs()) {
        let mut a = GameState::new(seed);
        let mut b = GameState::new(seed);
        for intent in intents(&runs) {
            sim::step(&mut a, &intent, DT);
            sim::step(&mut b, &intent, DT);
            prop_assert_eq!(&a.events, &b.events);
        }
        prop_assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[test]
    fn test_particles_age_out(seed in any::<u64>(), runs in input_runs()) {
        let mut state = GameState::new(seed);
        for intent in intents(&runs) {
            sim::step(&mut state, &intent, DT);
        }

        let mut batch = state.particles.clone();
        // Longest-lived particles start at 60
        for _ in 0..60 {
            let expected: Vec<i32> = batch
                .iter()
                .map(|p| p.life - 1)
                .filter(|&life| life > 0)
                .collect();
            particles::age_particles(&mut batch);
            let lives: Vec<i32> = batch.iter().map(|p| p.life).collect();
            prop_assert_eq!(lives, expected);
        }
        prop_assert!(batch.is_empty());
    }

    #[test]
    fn test_procedural_widths_and_spacing(seed in any::<u64>(), difficulty in 0u32..=12) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let start_y = -4000.0;
        let platforms =
            level::generate_section(start_y, SectionMode::Procedural(difficulty), &mut rng);
        let (catch, section) = platforms.split_last().unwrap();

        prop_assert_eq!(catch.pos.y, start_y + CATCH_OFFSET);
        prop_assert!(section.len() >= 6 && section.len() <= 6 + 3 + MAX_DIFFICULTY as usize / 4);

        let mut last_y = start_y;
        for platform in section {
            prop_assert!(platform.size.x >= level::MIN_PLATFORM_WIDTH);
            prop_assert!(platform.pos.x >= 50.0 && platform.pos.x <= 450.0);
            let gap = last_y - platform.pos.y;
            prop_assert!(gap >= level::MIN_SPACING - 1e-2 && gap <= level::MAX_SPACING + 1e-2);
            last_y = platform.pos.y;
        }
    }

    #[test]
    fn test_spliced_sections_stay_apart(seed in any::<u64>(), sections in 1u32..20) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut active =
            level::generate_section(SEA_LEVEL_Y, SectionMode::Pattern(0), &mut rng);
        for i in 0..sections {
            let start_y = -(i as f32 * SECTION_HEIGHT);
            let fresh =
                level::generate_section(start_y, SectionMode::for_section(i + 1), &mut rng);
            let offered = fresh.len();
            let before = active.len();
            let splice = level::splice_section(&mut active, fresh);

            prop_assert_eq!(active.len(), before - splice.displaced + offered - splice.dropped);
            prop_assert_eq!(active.last().unwrap().pos.y, start_y + CATCH_OFFSET);
            for (j, a) in active.iter().enumerate() {
                for b in &active[j + 1..] {
                    prop_assert!(!level::conflicts(a, b), "{:?} cuts into {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_section_modes(level_index in 0u32..200) {
        match SectionMode::for_section(level_index) {
            SectionMode::Pattern(i) => {
                prop_assert!(level_index < PATTERN_SECTIONS);
                prop_assert!((i as usize) < level::pattern_count());
            }
            SectionMode::Procedural(d) => {
                prop_assert!(level_index >= PATTERN_SECTIONS);
                prop_assert!(d <= MAX_DIFFICULTY);
            }
        }
    }
}
