//! Per-frame evaluation output

use serde::Serialize;

use crate::exercise::UNKNOWN;
use crate::pose::AngleSet;

/// Reported when the frame lacks the joints needed for a judgment
pub const CANT_SEE_ERROR: &str = "Can't see required joints";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// A declared phase name, TRANSITION or UNKNOWN
    pub phase: String,
    pub is_correct: bool,
    /// Most severe first, deduplicated and capped
    pub errors: Vec<String>,
    /// Range-scored joint hints for the current phase
    pub hints: Vec<String>,
    pub angles: AngleSet,
    /// Best phase score, 0..=100
    pub accuracy: f32,
    /// Filled in by the session; `None` for holds
    pub is_moving: Option<bool>,
    pub is_in_position: Option<bool>,
}

impl EvaluationResult {
    /// "Can't see" result for a frame with missing landmarks
    pub fn degraded() -> Self {
        Self {
            phase: UNKNOWN.to_string(),
            is_correct: false,
            errors: vec![CANT_SEE_ERROR.to_string()],
            hints: Vec::new(),
            angles: AngleSet::new(),
            accuracy: 0.0,
            is_moving: None,
            is_in_position: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.phase == UNKNOWN
    }
}
