//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod session;
mod speech;

pub use session::{
    // WASM entry points
    start_session,
    feed_landmarks,
    finish_session,
    abort_session,
    set_voice_enabled,
    take_events,
    current_reps,
    current_phase,
    list_exercises,
    match_exercise,
    load_exercises,
    // Constants
    LANDMARK_STRIDE,
};

pub use speech::WebSpeechSink;
