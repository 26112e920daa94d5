//! Session events emitted upward
//!
//! Serialized with a `type` tag so a transport can forward them as-is.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    #[serde(rename_all = "camelCase")]
    ExerciseSelected {
        exercise_id: String,
        exercise_name: String,
    },

    PhaseChanged { phase: String },

    RepCounted { reps: u32 },

    SpeakRequested { message: String, forced: bool },

    /// Periodic form snapshot
    #[serde(rename_all = "camelCase")]
    PoseUpdate {
        reps: u32,
        phase: String,
        is_correct: bool,
        errors: Vec<String>,
        is_moving: Option<bool>,
        accuracy: f32,
    },

    #[serde(rename_all = "camelCase")]
    SessionEnded { exercise_id: String, reps: u32 },
}
