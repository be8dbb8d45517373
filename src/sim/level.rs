//! Section generation
//!
//! A section is a batch of platforms laid out upward from a start line.
//! The first few sections come from a small hand-authored library; after
//! that sections are procedural and get harder with the section index.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Platform;
use crate::consts::*;

/// How a section's platforms are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionMode {
    /// Index into the pattern library (wraps)
    Pattern(u32),
    /// Difficulty, clamped to `0..=MAX_DIFFICULTY`
    Procedural(u32),
}

impl SectionMode {
    /// Mode for the section generated when `level_index` is reached
    pub fn for_section(level_index: u32) -> Self {
        if level_index < PATTERN_SECTIONS {
            SectionMode::Pattern(level_index % PATTERNS.len() as u32)
        } else {
            SectionMode::Procedural((level_index / 4).min(MAX_DIFFICULTY))
        }
    }
}

/// One platform in a pattern: x, height above the start line, width
#[derive(Debug, Clone, Copy)]
struct Slot {
    x: f32,
    offset: f32,
    width: f32,
}

const fn slot(x: f32, offset: f32, width: f32) -> Slot {
    Slot { x, offset, width }
}

struct Pattern {
    name: &'static str,
    slots: &'static [Slot],
}

const PATTERNS: [Pattern; 4] = [
    Pattern {
        name: "staircase",
        slots: &[
            slot(100.0, 700.0, 200.0),
            slot(400.0, 600.0, 150.0),
            slot(50.0, 500.0, 180.0),
            slot(350.0, 400.0, 200.0),
            slot(150.0, 300.0, 120.0),
            slot(400.0, 200.0, 160.0),
            slot(100.0, 100.0, 250.0),
        ],
    },
    Pattern {
        name: "narrow",
        slots: &[
            slot(200.0, 800.0, 100.0),
            slot(400.0, 700.0, 80.0),
            slot(100.0, 600.0, 90.0),
            slot(350.0, 500.0, 70.0),
            slot(150.0, 400.0, 100.0),
            slot(400.0, 300.0, 80.0),
            slot(50.0, 200.0, 120.0),
            slot(300.0, 100.0, 100.0),
        ],
    },
    Pattern {
        name: "wide gaps",
        slots: &[
            slot(50.0, 900.0, 150.0),
            slot(350.0, 750.0, 200.0),
            slot(100.0, 600.0, 100.0),
            slot(400.0, 450.0, 150.0),
            slot(50.0, 300.0, 180.0),
            slot(350.0, 150.0, 200.0),
        ],
    },
    Pattern {
        name: "precise",
        slots: &[
            slot(250.0, 750.0, 60.0),
            slot(150.0, 650.0, 80.0),
            slot(400.0, 550.0, 60.0),
            slot(100.0, 450.0, 70.0),
            slot(350.0, 350.0, 90.0),
            slot(200.0, 250.0, 60.0),
            slot(50.0, 150.0, 100.0),
            slot(400.0, 50.0, 150.0),
        ],
    },
];

/// Maximum horizontal jitter either side for pattern platforms
pub const PATTERN_X_JITTER: f32 = 10.0;
/// Maximum width jitter either side for pattern platforms
pub const PATTERN_WIDTH_JITTER: f32 = 5.0;

/// Narrowest procedural platform
pub const MIN_PLATFORM_WIDTH: f32 = 60.0;
/// Procedural vertical spacing bounds
pub const MIN_SPACING: f32 = 90.0;
pub const MAX_SPACING: f32 = 150.0;

/// Number of layouts in the pattern library
pub fn pattern_count() -> usize {
    PATTERNS.len()
}

/// Full-width safety net laid under every section
pub fn catch_platform(start_y: f32) -> Platform {
    Platform::new(0.0, start_y + CATCH_OFFSET, CATCH_WIDTH, CATCH_HEIGHT)
}

/// Generate a section whose start line is `start_y`. Pattern platforms keep
/// the library's top-down order, procedural ones are laid bottom-up. The
/// catch platform is always last.
pub fn generate_section<R: Rng>(start_y: f32, mode: SectionMode, rng: &mut R) -> Vec<Platform> {
    let mut platforms = match mode {
        SectionMode::Pattern(index) => pattern_section(start_y, index, rng),
        SectionMode::Procedural(difficulty) => procedural_section(start_y, difficulty, rng),
    };
    platforms.push(catch_platform(start_y));
    platforms
}

/// Boxes intersect at different heights. Platforms sharing a top surface
/// land the player at the same y whichever is resolved first.
pub fn conflicts(a: &Platform, b: &Platform) -> bool {
    a.pos.y != b.pos.y && a.overlaps(b)
}

/// What `splice_section` left out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Splice {
    /// New platforms skipped because they cut into a survivor
    pub dropped: usize,
    /// Older platforms removed because the new catch platform covers them
    pub displaced: usize,
}

/// Append a generated section (catch platform last) to the active platforms
/// so that no two of them conflict. The catch platform always goes in.
pub fn splice_section(active: &mut Vec<Platform>, mut fresh: Vec<Platform>) -> Splice {
    let mut splice = Splice::default();
    let Some(catch) = fresh.pop() else {
        return splice;
    };

    let before = active.len();
    active.retain(|p| !conflicts(p, &catch));
    splice.displaced = before - active.len();

    for platform in fresh {
        if active.iter().any(|p| conflicts(p, &platform)) {
            splice.dropped += 1;
        } else {
            active.push(platform);
        }
    }
    active.push(catch);
    splice
}

fn pattern_section<R: Rng>(start_y: f32, index: u32, rng: &mut R) -> Vec<Platform> {
    let pattern = &PATTERNS[index as usize % PATTERNS.len()];
    log::debug!("Pattern section '{}' at y={}", pattern.name, start_y);

    pattern
        .slots
        .iter()
        .map(|s| {
            let x = s.x + (rng.random::<f32>() - 0.5) * 2.0 * PATTERN_X_JITTER;
            let width = s.width + (rng.random::<f32>() - 0.5) * 2.0 * PATTERN_WIDTH_JITTER;
            Platform::new(x, start_y - s.offset, width, PLATFORM_THICKNESS)
        })
        .collect()
}

fn procedural_section<R: Rng>(start_y: f32, difficulty: u32, rng: &mut R) -> Vec<Platform> {
    let difficulty = difficulty.min(MAX_DIFFICULTY);
    let count = 6 + rng.random_range(0..=3) + difficulty / 4;
    let span = SECTION_HEIGHT + rng.random::<f32>() * 400.0;
    let spacing = (span / count as f32).clamp(MIN_SPACING, MAX_SPACING);
    log::debug!(
        "Procedural section at y={} difficulty={} count={} spacing={:.1}",
        start_y,
        difficulty,
        count,
        spacing
    );

    (0..count)
        .map(|i| {
            let y = start_y - (i + 1) as f32 * spacing;
            let x = 50.0 + rng.random::<f32>() * 400.0;
            let width = (150.0 - difficulty as f32 * 10.0 + rng.random::<f32>() * 50.0)
                .max(MIN_PLATFORM_WIDTH);
            Platform::new(x, y, width, PLATFORM_THICKNESS)
        })
        .collect()
}
