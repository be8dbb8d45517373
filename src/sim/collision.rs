//! Collision detection and response between the player box and platforms
//!
//! Boxes are axis-aligned. Each overlapping platform is resolved along its
//! shallowest face in a single pass, in platform order. A later platform can
//! override an earlier one. Active platforms never cut into each other at
//! different heights (see `level::splice_section`), so two hits in one pass
//! share a top surface and clamp the player to the same place.

use super::state::{Platform, Player};
use crate::consts::CONTACT_EPSILON;

/// Platform face the player pushed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Player came down onto the platform
    Top,
    /// Player's head hit the underside
    Bottom,
    /// Player ran into the left side
    Left,
    /// Player ran into the right side
    Right,
}

/// Penetration depth per face, measured from the platform's point of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlap {
    fn min(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }

    /// Shallowest face whose direction matches the player's velocity.
    /// Ties go top, bottom, left, right.
    pub fn resolving_face(&self, player: &Player) -> Option<Face> {
        let min = self.min();
        let candidates = [
            (Face::Top, self.top, player.vel.y > 0.0),
            (Face::Bottom, self.bottom, player.vel.y < 0.0),
            (Face::Left, self.left, player.vel.x > 0.0),
            (Face::Right, self.right, player.vel.x < 0.0),
        ];
        candidates
            .into_iter()
            .find(|&(_, depth, moving_in)| depth == min && moving_in)
            .map(|(face, _, _)| face)
    }
}

/// Strict box overlap; touching edges do not count
pub fn overlap(player: &Player, platform: &Platform) -> Option<Overlap> {
    let intersects = player.pos.x < platform.right()
        && player.right() > platform.pos.x
        && player.pos.y < platform.bottom()
        && player.bottom() > platform.pos.y;
    if !intersects {
        return None;
    }

    Some(Overlap {
        left: player.right() - platform.pos.x,
        right: platform.right() - player.pos.x,
        top: player.bottom() - platform.pos.y,
        bottom: platform.bottom() - player.pos.y,
    })
}

/// Player is standing exactly on the platform's top surface
pub fn resting_on(player: &Player, platform: &Platform) -> bool {
    player.pos.x < platform.right()
        && player.right() > platform.pos.x
        && (player.bottom() - platform.pos.y).abs() <= CONTACT_EPSILON
        && player.vel.y >= 0.0
}

/// What the collision pass did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Resolution {
    /// Grounded state when the pass began
    pub was_grounded: bool,
    /// At least one landing was resolved
    pub landed: bool,
    /// Distance descended, when a landing ended a tracked fall
    pub fall_distance: Option<f32>,
}

impl Resolution {
    /// Landing that started from the air
    pub fn touched_down(&self) -> bool {
        self.landed && !self.was_grounded
    }
}

/// Resolve the player against every platform and settle grounded state
pub fn resolve_collisions(player: &mut Player, platforms: &[Platform]) -> Resolution {
    let mut resolution = Resolution {
        was_grounded: player.is_grounded,
        ..Default::default()
    };
    player.is_grounded = false;

    for platform in platforms {
        let Some(depths) = overlap(player, platform) else {
            if resolution.was_grounded && resting_on(player, platform) {
                player.is_grounded = true;
            }
            continue;
        };

        match depths.resolving_face(player) {
            Some(Face::Top) => {
                player.pos.y = platform.pos.y - player.size.y;
                player.vel.y = 0.0;
                player.is_grounded = true;
                player.last_grounded_y = player.last_grounded_y.min(player.pos.y);
                resolution.landed = true;

                if player.is_falling {
                    player.fall_distance = player.pos.y - player.fall_start_y;
                    player.is_falling = false;
                    resolution.fall_distance = Some(player.fall_distance);
                }
            }
            Some(Face::Bottom) => {
                player.pos.y = platform.bottom();
                player.vel.y = 0.0;
            }
            Some(Face::Left) => {
                player.pos.x = platform.pos.x - player.size.x;
                player.vel.x = 0.0;
            }
            Some(Face::Right) => {
                player.pos.x = platform.right();
                player.vel.x = 0.0;
            }
            None => {}
        }
    }

    resolution
}
