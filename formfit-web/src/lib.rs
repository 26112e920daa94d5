//! FormFit Web - real-time exercise form coaching
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! Per frame: landmarks → angles → form verdict → phase/rep state →
//! throttled coaching speech.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod exercise;
pub mod feedback;
pub mod pose;
pub mod reps;
pub mod session;

mod bridge;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    abort_session, current_phase, current_reps, feed_landmarks, finish_session, list_exercises,
    load_exercises, match_exercise, set_voice_enabled, start_session, take_events, WebSpeechSink,
    LANDMARK_STRIDE,
};

pub use config::EngineConfig;
pub use error::{CatalogError, ConfigError, SinkError};
pub use evaluator::{EvaluationResult, FormEvaluator};
pub use events::SessionEvent;
pub use exercise::{Catalog, Exercise};
pub use session::{CoachSession, FrameOutcome};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
