//! Exercise module - immutable exercise definitions and the catalog
//!
//! Re-exports only. All logic in submodules.

mod catalog;
mod definition;

pub use catalog::Catalog;
pub use definition::{
    AngleRange, Category, Difficulty, Exercise, FormRule, Phase, RepCycle,
    READY, TRANSITION, UNKNOWN,
};
