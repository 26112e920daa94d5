//! Form evaluator - landmarks in, verdict out
//!
//! Pure per-frame transform: no state survives between calls, so the same
//! frame and exercise always give the same result.

use super::result::EvaluationResult;
use super::rules;
use super::scoring;
use crate::config::ScoringConfig;
use crate::config::RuleTolerances;
use crate::exercise::{Exercise, FormRule};
use crate::pose::{extract_angles, Frame};

#[derive(Debug, Clone, Default)]
pub struct FormEvaluator {
    scoring: ScoringConfig,
    tolerances: RuleTolerances,
}

impl FormEvaluator {
    pub fn new(scoring: ScoringConfig, tolerances: RuleTolerances) -> Self {
        Self { scoring, tolerances }
    }

    /// Judge one frame against `exercise`
    ///
    /// An absent frame or one missing body joints yields the degraded
    /// "can't see" result with phase UNKNOWN.
    pub fn evaluate(&self, frame: Option<&Frame>, exercise: &Exercise) -> EvaluationResult {
        let Some(frame) = frame else {
            return EvaluationResult::degraded();
        };
        let Some(angles) = extract_angles(frame) else {
            return EvaluationResult::degraded();
        };

        let matched = scoring::classify(exercise, &angles, &self.scoring);
        let verdict = rules::check(exercise.rule, frame, &angles, &self.tolerances);

        let mut errors: Vec<String> = match exercise.rule {
            FormRule::Generic => matched.hints.clone(),
            _ => verdict.errors.iter().map(|e| e.to_string()).collect(),
        };
        errors.dedup();
        errors.truncate(self.scoring.max_errors);

        EvaluationResult {
            phase: matched.phase,
            is_correct: errors.is_empty(),
            errors,
            hints: matched.hints,
            angles,
            accuracy: matched.accuracy,
            is_moving: None,
            is_in_position: verdict.in_position,
        }
    }
}
