//! Evaluator module - per-frame form verdicts
//!
//! Re-exports only. All logic in submodules.

mod form;
mod result;
mod rules;
mod scoring;

#[cfg(test)]
pub(crate) mod test_poses;

pub use form::FormEvaluator;
pub use result::{EvaluationResult, CANT_SEE_ERROR};
pub use rules::{
    check as check_rules, RuleVerdict,
    ARMS_UNEVEN, STACK_WRISTS, WEIGHT_UNEVEN, KNEES_PAST_TOES,
    PUSH_UNEVEN, HIPS_SAG, HIPS_PIKE, FRONT_KNEE,
    RAISE_UNEVEN, RAISE_TOO_HIGH, CURL_UNEVEN, ELBOW_DRIFT,
};
pub use scoring::{classify, phase_hints, score_phase, PhaseMatch};
