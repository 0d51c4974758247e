//! Background Tasks Module
//!
//! Contains the background task that runs alongside a TTL cache and the
//! machinery used to stop it.
//!
//! # Tasks
//! - TTL Reaper: Removes expired cache entries at a fixed interval

mod lifecycle;
mod reaper;

pub use lifecycle::{Lifecycle, LifecycleState};
pub use reaper::{spawn_reaper, Sweep};
