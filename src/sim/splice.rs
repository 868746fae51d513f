//! Splicing a landed bullet into the train
//!
//! All relinking happens through `Train::link_before`/`link_after`, so the
//! chain stays acyclic with a single root after every splice.

use super::chain::{MarbleId, Train};
use super::motion::{Impact, push_from};

/// Which neighbour slot the bullet took relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceSide {
    /// Bullet came in from the root side (smaller y): inserted before target
    RootSide,
    /// Bullet came in from the tail side: inserted after target
    TailSide,
}

/// Insert `bullet` next to the impact target, seat it at the target's
/// position and settle the overlap this creates downstream.
///
/// Only the travel-axis coordinate decides the side, so a near-perpendicular
/// approach can land on the "wrong" side of the target.
pub fn splice(train: &mut Train, bullet: MarbleId, impact: Impact) -> SpliceSide {
    let Impact { target, prev } = impact;
    let target_pos = train.get(target).pos;
    let side = if train.get(bullet).pos.y < target_pos.y {
        SpliceSide::RootSide
    } else {
        SpliceSide::TailSide
    };

    train.get_mut(bullet).pos = target_pos;
    match side {
        SpliceSide::RootSide => {
            train.link_before(prev, target, bullet);
            push_from(train, bullet);
        }
        SpliceSide::TailSide => {
            train.link_after(target, bullet);
            push_from(train, target);
        }
    }

    log::trace!("spliced bullet {bullet} {side:?} of {target}");
    side
}
