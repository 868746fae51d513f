//! Marble arena and the train's singly-linked chain
//!
//! Marbles live in fixed-capacity slots addressed by `MarbleId`. The train
//! is a root handle plus per-marble `next` links. Releasing a marble puts
//! its slot back on the free list; nothing is ever deallocated.

use std::fmt;

use glam::Vec2;

use super::state::MarbleColor;
use crate::error::{ChainFault, SimError};

/// Stable handle to a marble slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarbleId(u16);

impl MarbleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MarbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A marble, either chained into the train or flying as the bullet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marble {
    pub pos: Vec2,
    pub color: MarbleColor,
    /// Following marble in the train (away from the root)
    pub next: Option<MarbleId>,
}

impl Marble {
    pub fn new(pos: Vec2, color: MarbleColor) -> Self {
        Self {
            pos,
            color,
            next: None,
        }
    }
}

/// Arena of marble slots plus the train's root link
#[derive(Debug, Clone)]
pub struct Train {
    slots: Vec<Option<Marble>>,
    free: Vec<MarbleId>,
    root: Option<MarbleId>,
}

impl Train {
    /// Create an empty train backed by `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(u16::MAX as usize);
        Self {
            slots: vec![None; capacity],
            // Reverse so the lowest index is handed out first
            free: (0..capacity as u16).rev().map(MarbleId).collect(),
            root: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots (chain members plus any loose bullet)
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn root(&self) -> Option<MarbleId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Take a free slot for a new, unlinked marble
    pub fn alloc(&mut self, pos: Vec2, color: MarbleColor) -> Result<MarbleId, SimError> {
        let id = self.free.pop().ok_or(SimError::PoolExhausted {
            capacity: self.capacity(),
        })?;
        self.slots[id.index()] = Some(Marble::new(pos, color));
        Ok(id)
    }

    /// Return a slot to the free list. The caller must already have
    /// unlinked it from the chain.
    pub fn release(&mut self, id: MarbleId) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(slot.is_some(), "double release of marble {id}");
        if slot.take().is_some() {
            self.free.push(id);
        }
    }

    /// Append a marble after the current tail
    pub fn push_back(&mut self, pos: Vec2, color: MarbleColor) -> Result<MarbleId, SimError> {
        let id = self.alloc(pos, color)?;
        match self.tail() {
            Some(tail) => self.get_mut(tail).next = Some(id),
            None => self.root = Some(id),
        }
        Ok(id)
    }

    /// Access a live marble. Panics on a vacant slot: holding a stale
    /// handle is a structural defect, not a runtime condition.
    pub fn get(&self, id: MarbleId) -> &Marble {
        match &self.slots[id.index()] {
            Some(marble) => marble,
            None => panic!("marble {id} is not live"),
        }
    }

    pub fn get_mut(&mut self, id: MarbleId) -> &mut Marble {
        match &mut self.slots[id.index()] {
            Some(marble) => marble,
            None => panic!("marble {id} is not live"),
        }
    }

    pub fn next(&self, id: MarbleId) -> Option<MarbleId> {
        self.get(id).next
    }

    /// Walk the chain front (root) to back
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            train: self,
            cursor: self.root,
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Furthest-advanced marble (last in chain order)
    pub fn tail(&self) -> Option<MarbleId> {
        self.iter().last()
    }

    /// Link `new` immediately before `target`, whose predecessor is `prev`
    /// (`None` when `target` is the root).
    pub fn link_before(&mut self, prev: Option<MarbleId>, target: MarbleId, new: MarbleId) {
        debug_assert_eq!(
            prev.map_or(self.root, |p| self.next(p)),
            Some(target),
            "predecessor of {target} is stale"
        );
        self.get_mut(new).next = Some(target);
        match prev {
            Some(p) => self.get_mut(p).next = Some(new),
            None => self.root = Some(new),
        }
    }

    /// Link `new` immediately after `target`
    pub fn link_after(&mut self, target: MarbleId, new: MarbleId) {
        let after = self.next(target);
        self.get_mut(new).next = after;
        self.get_mut(target).next = Some(new);
    }

    /// Unlink and release `count` marbles following `before` (or starting
    /// at the root when `before` is `None`). Returns how many were removed.
    pub fn remove_run(&mut self, before: Option<MarbleId>, count: usize) -> usize {
        let mut cursor = match before {
            Some(b) => self.next(b),
            None => self.root,
        };
        let mut removed = 0;
        while removed < count {
            let Some(id) = cursor else { break };
            cursor = self.next(id);
            self.get_mut(id).next = None;
            self.release(id);
            removed += 1;
        }
        match before {
            Some(b) => self.get_mut(b).next = cursor,
            None => self.root = cursor,
        }
        removed
    }

    /// Check the chain and free list for structural faults
    pub fn validate(&self) -> Result<(), ChainFault> {
        let mut seen = vec![false; self.capacity()];
        let mut len = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let Some(marble) = self.slots.get(id.index()).and_then(Option::as_ref) else {
                return Err(ChainFault::DanglingLink { to: id });
            };
            if seen[id.index()] {
                return Err(ChainFault::Cycle { at: id });
            }
            seen[id.index()] = true;
            len += 1;
            if len > self.capacity() {
                return Err(ChainFault::LengthOverCapacity {
                    len,
                    capacity: self.capacity(),
                });
            }
            cursor = marble.next;
        }

        let mut freed = vec![false; self.capacity()];
        for &id in &self.free {
            if seen[id.index()] {
                return Err(ChainFault::FreeListedMember { id });
            }
            if freed[id.index()] {
                return Err(ChainFault::DoubleFree { id });
            }
            freed[id.index()] = true;
        }
        Ok(())
    }
}

/// Iterator over chain handles, root first
pub struct ChainIter<'a> {
    train: &'a Train,
    cursor: Option<MarbleId>,
}

impl Iterator for ChainIter<'_> {
    type Item = MarbleId;

    fn next(&mut self) -> Option<MarbleId> {
        let id = self.cursor?;
        self.cursor = self.train.next(id);
        Some(id)
    }
}
