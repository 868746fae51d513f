//! Cooperative task layer
//!
//! - `lock`: bounded acquisition of the spin locks
//! - `shared`: the lock-guarded state the tasks communicate through
//! - `tasks`: pot, joystick, simulation, render and indicator tasks
//! - `scheduler`: round-robin driver

pub mod lock;
pub mod scheduler;
pub mod shared;
pub mod tasks;

pub use lock::{acquire, acquire_within};
pub use scheduler::Scheduler;
pub use shared::{POT_LOCK, SIM_LOCK, SWAP_LOCK, Shared};
pub use tasks::{IndicatorTask, JoystickSampler, PotSampler, RenderTask, SimulationTask, Task};
