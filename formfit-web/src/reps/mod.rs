//! Reps module - phase settling, rep counting, movement detection
//!
//! Re-exports only. All logic in submodules.

mod counter;
mod history;
mod movement;

pub use counter::{RepCounter, RepEvent};
pub use history::PhaseHistory;
pub use movement::MovementTracker;
