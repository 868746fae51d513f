//! Train and bullet motion, plus marble contact detection
//!
//! The train travels along +y. The root is the pushing marble; each
//! successor in contact is dragged to sit `MARBLE_DIAMETER - 1` further
//! along the axis than its predecessor.

use glam::Vec2;

use super::chain::{MarbleId, Train};
use crate::consts::*;

/// Gap kept between touching neighbours (one pixel of overlap so that
/// contact keeps registering)
pub const CONTACT_SPACING: f32 = MARBLE_DIAMETER - 1.0;

/// True iff the marbles' centers are strictly closer than one diameter
#[inline]
pub fn collides(a: Vec2, b: Vec2) -> bool {
    a.distance(b) < MARBLE_DIAMETER
}

/// Drag every touching successor of `from` into contact spacing, stopping
/// at the first marble that is not in contact or at the end of the chain.
pub fn push_from(train: &mut Train, from: MarbleId) {
    let mut current = from;
    while let Some(next) = train.next(current) {
        let lead = train.get(current).pos;
        if !collides(lead, train.get(next).pos) {
            break;
        }
        train.get_mut(next).pos = lead + Vec2::new(0.0, CONTACT_SPACING);
        current = next;
    }
}

/// Advance the root by `TRAIN_SPEED * dt` and push its touching group
pub fn advance_train(train: &mut Train, dt: f32) {
    let Some(root) = train.root() else {
        return;
    };
    train.get_mut(root).pos.y += TRAIN_SPEED * dt;
    push_from(train, root);
}

/// Whether a bullet center is still inside the playfield margin
#[inline]
pub fn in_playfield(pos: Vec2) -> bool {
    pos.x < WINDOW_X - MARBLE_DIAMETER
        && pos.x > MARBLE_DIAMETER
        && pos.y < WINDOW_Y - MARBLE_DIAMETER
        && pos.y > MARBLE_DIAMETER
}

/// Result of moving the bullet one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightStep {
    /// Still inside the playfield
    InFlight,
    /// Left the playfield; the bullet must be discarded
    OutOfBounds,
}

/// Move a bullet along its flight vector
pub fn advance_bullet(pos: &mut Vec2, angle: f32, dt: f32) -> FlightStep {
    *pos += Vec2::new(angle.cos(), angle.sin()) * BULLET_SPEED * dt;
    if in_playfield(*pos) {
        FlightStep::InFlight
    } else {
        FlightStep::OutOfBounds
    }
}

/// Train marble hit by the bullet, with its chain predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub target: MarbleId,
    /// `None` when the target is the root
    pub prev: Option<MarbleId>,
}

/// First marble, walking from the root, that the bullet touches
pub fn find_impact(train: &Train, bullet_pos: Vec2) -> Option<Impact> {
    let mut prev = None;
    for id in train.iter() {
        if collides(bullet_pos, train.get(id).pos) {
            return Some(Impact { target: id, prev });
        }
        prev = Some(id);
    }
    None
}
