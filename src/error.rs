use std::fmt;

use crate::sim::MarbleId;

/// Fatal simulation failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// No free slot left in the marble arena
    PoolExhausted { capacity: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoolExhausted { capacity } => {
                write!(f, "marble arena exhausted: all {capacity} slots live")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Structural invariant violations reported by `Train::validate`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainFault {
    /// Walking `next` links revisited a marble
    Cycle { at: MarbleId },
    /// A link (or the root) points at a vacant slot
    DanglingLink { to: MarbleId },
    /// A chain member is also on the free list
    FreeListedMember { id: MarbleId },
    /// The free list holds the same slot twice
    DoubleFree { id: MarbleId },
    /// More chain members than the arena can hold
    LengthOverCapacity { len: usize, capacity: usize },
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { at } => write!(f, "chain cycle through marble {at}"),
            Self::DanglingLink { to } => write!(f, "chain links to vacant slot {to}"),
            Self::FreeListedMember { id } => {
                write!(f, "marble {id} is both chained and on the free list")
            }
            Self::DoubleFree { id } => write!(f, "slot {id} is on the free list twice"),
            Self::LengthOverCapacity { len, capacity } => {
                write!(f, "chain length {len} exceeds arena capacity {capacity}")
            }
        }
    }
}

impl std::error::Error for ChainFault {}

/// A bounded lock wait ran out of attempts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockTimeout {
    pub lock: &'static str,
    pub attempts: u32,
}

impl fmt::Display for LockTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lock `{}` not acquired after {} attempts",
            self.lock, self.attempts
        )
    }
}

impl std::error::Error for LockTimeout {}

/// Fatal scheduler failure, tagged with the task that hit it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedError {
    Lock { task: &'static str, source: LockTimeout },
    Sim { task: &'static str, source: SimError },
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock { task, source } => write!(f, "task `{task}`: {source}"),
            Self::Sim { task, source } => write!(f, "task `{task}`: {source}"),
        }
    }
}

impl std::error::Error for SchedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lock { source, .. } => Some(source),
            Self::Sim { source, .. } => Some(source),
        }
    }
}

/// Failure inside a single task step, before the scheduler tags it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskError {
    Lock(LockTimeout),
    Sim(SimError),
}

impl From<LockTimeout> for TaskError {
    fn from(err: LockTimeout) -> Self {
        Self::Lock(err)
    }
}

impl From<SimError> for TaskError {
    fn from(err: SimError) -> Self {
        Self::Sim(err)
    }
}

impl TaskError {
    pub fn in_task(self, task: &'static str) -> SchedError {
        match self {
            Self::Lock(source) => SchedError::Lock { task, source },
            Self::Sim(source) => SchedError::Sim { task, source },
        }
    }
}
