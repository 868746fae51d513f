//! Same-color run elimination around a freshly landed marble
//!
//! A run is a maximal stretch of consecutive chain members that share the
//! landed marble's color and are physically touching. Only the run that
//! holds the landed marble is considered.

use super::chain::{MarbleId, Train};
use super::motion::collides;
use crate::consts::COLLAPSE_RUN;

/// Outcome of a collapse attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapse {
    /// The landed marble's run was removed
    Collapsed { removed: usize },
    /// Run too short (or landed marble not in the chain)
    Kept,
}

impl Collapse {
    pub fn collapsed(self) -> bool {
        matches!(self, Collapse::Collapsed { .. })
    }
}

/// Scan the chain once, root to tail, and remove the run containing
/// `landed` if it holds at least `COLLAPSE_RUN` marbles.
pub fn collapse(train: &mut Train, landed: MarbleId) -> Collapse {
    let color = train.get(landed).color;
    let mut cursor = train.root();
    // Chain member just before the run under test
    let mut before_run: Option<MarbleId> = None;
    let mut run_len = 0usize;
    let mut landed_seen = false;

    while let Some(id) = cursor {
        let marble = *train.get(id);
        if id == landed {
            landed_seen = true;
        }
        if marble.color == color {
            run_len += 1;
        }

        let run_ends = marble.color != color
            || match marble.next {
                None => true,
                Some(next) => {
                    let next = train.get(next);
                    next.color != color || !collides(marble.pos, next.pos)
                }
            };

        if run_ends {
            if landed_seen {
                if run_len < COLLAPSE_RUN {
                    return Collapse::Kept;
                }
                let removed = train.remove_run(before_run, run_len);
                log::debug!("collapsed {removed} {color:?} marbles");
                return Collapse::Collapsed { removed };
            }
            run_len = 0;
            before_run = Some(id);
        }
        cursor = marble.next;
    }

    Collapse::Kept
}
