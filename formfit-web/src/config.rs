//! Engine tunables
//!
//! Every threshold the engine uses lives here so the browser can override
//! them with a JSON document. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub rules: RuleTolerances,
    pub reps: RepCounterConfig,
    pub feedback: FeedbackConfig,
    pub smoothing: SmoothingConfig,
    /// Span of the rolling angle baseline used for motion detection
    pub movement_window_ms: u64,
}

/// Range-scored phase classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Best phase scores below this are reported as TRANSITION
    pub min_phase_score: f32,
    /// Points lost per degree outside a phase range
    pub decay_per_degree: f32,
    /// Deviation (degrees) before a joint hint is produced
    pub hint_threshold_deg: f32,
    pub max_hints: usize,
    pub max_errors: usize,
}

/// Thresholds for the per-exercise rule checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTolerances {
    /// Left/right knee difference allowed for squats and lunges
    pub leg_symmetry_deg: f32,
    /// Left/right difference allowed for presses, push-ups and raises
    pub arm_symmetry_deg: f32,
    /// Left/right elbow difference allowed for curls
    pub curl_symmetry_deg: f32,
    /// Horizontal wrist/elbow offset (normalized) for the stacking check
    pub stack_offset: f32,
    /// Horizontal knee/ankle offset (normalized) for knee tracking checks
    pub knee_over_toe_offset: f32,
    /// Body line angle below which hips are sagging or piking
    pub body_line_min_deg: f32,
    pub raise_max_deg: f32,
    pub elbow_pin_max_deg: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepCounterConfig {
    /// Phase labels kept in history
    pub history_len: usize,
    /// Consecutive identical labels needed to settle on a phase
    pub confirm_frames: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Minimum quiet time between non-forced messages
    pub min_gap_ms: u64,
    /// Interval between `pose_update` snapshots
    pub pose_update_interval_ms: u64,
    /// An utterance with no end callback after this long is treated as done
    pub max_utterance_ms: u64,
}

/// One-euro landmark smoothing, applied before evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub enabled: bool,
    pub min_cutoff: f32,
    pub beta: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            rules: RuleTolerances::default(),
            reps: RepCounterConfig::default(),
            feedback: FeedbackConfig::default(),
            smoothing: SmoothingConfig::default(),
            movement_window_ms: 1500,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_phase_score: 50.0,
            decay_per_degree: 2.5,
            hint_threshold_deg: 15.0,
            max_hints: 2,
            max_errors: 3,
        }
    }
}

impl Default for RuleTolerances {
    fn default() -> Self {
        Self {
            leg_symmetry_deg: 15.0,
            arm_symmetry_deg: 20.0,
            curl_symmetry_deg: 25.0,
            stack_offset: 0.05,
            knee_over_toe_offset: 0.05,
            body_line_min_deg: 160.0,
            raise_max_deg: 110.0,
            elbow_pin_max_deg: 35.0,
        }
    }
}

impl Default for RepCounterConfig {
    fn default() -> Self {
        Self {
            history_len: 12,
            confirm_frames: 2,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            min_gap_ms: 3500,
            pose_update_interval_ms: 1000,
            max_utterance_ms: 10_000,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_cutoff: 1.0,
            beta: 0.15,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        if !(0.0..=100.0).contains(&s.min_phase_score) {
            return Err(out_of_range("scoring.min_phase_score", "within 0..=100"));
        }
        if !(s.decay_per_degree > 0.0) {
            return Err(out_of_range("scoring.decay_per_degree", "positive"));
        }
        if !(s.hint_threshold_deg >= 0.0) {
            return Err(out_of_range("scoring.hint_threshold_deg", "non-negative"));
        }
        if s.max_errors == 0 {
            return Err(out_of_range("scoring.max_errors", "at least 1"));
        }

        let r = &self.reps;
        if r.confirm_frames == 0 {
            return Err(out_of_range("reps.confirm_frames", "at least 1"));
        }
        if r.history_len < r.confirm_frames.max(2) {
            return Err(out_of_range(
                "reps.history_len",
                "at least 2 and at least reps.confirm_frames",
            ));
        }

        if self.feedback.max_utterance_ms == 0 {
            return Err(out_of_range("feedback.max_utterance_ms", "positive"));
        }

        if self.movement_window_ms == 0 {
            return Err(out_of_range("movement_window_ms", "positive"));
        }
        if self.smoothing.enabled && !(self.smoothing.min_cutoff > 0.0) {
            return Err(out_of_range("smoothing.min_cutoff", "positive"));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, requirement: &'static str) -> ConfigError {
    ConfigError::OutOfRange { field, requirement }
}
