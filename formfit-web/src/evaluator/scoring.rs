//! Range-scored phase classification
//!
//! Each phase earns 100 points per required angle inside its range and
//! loses `decay_per_degree` points per degree outside it (floored at 0).
//! The phase with the best average is the current phase.

use crate::config::ScoringConfig;
use crate::exercise::{Exercise, Phase, TRANSITION};
use crate::pose::AngleSet;

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseMatch {
    /// Winning phase name, or TRANSITION
    pub phase: String,
    /// Best average score, 0..=100
    pub accuracy: f32,
    pub hints: Vec<String>,
}

/// Average per-angle score for one phase, `None` if no required angle was measured
pub fn score_phase(phase: &Phase, angles: &AngleSet, config: &ScoringConfig) -> Option<f32> {
    let scores: Vec<f32> = phase
        .angles
        .iter()
        .filter_map(|(&name, range)| {
            let value = angles.get(name)?;
            let off = range.deviation(value).abs();
            Some((100.0 - off * config.decay_per_degree).max(0.0))
        })
        .collect();

    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f32>() / scores.len() as f32)
    }
}

/// "<joint>: extend/bend more" for every angle beyond the hint threshold
pub fn phase_hints(phase: &Phase, angles: &AngleSet, config: &ScoringConfig) -> Vec<String> {
    let mut hints: Vec<String> = Vec::new();
    for (&name, range) in &phase.angles {
        let Some(value) = angles.get(name) else {
            continue;
        };
        let off = range.deviation(value);
        if off.abs() <= config.hint_threshold_deg {
            continue;
        }
        let action = if off < 0.0 { "extend" } else { "bend" };
        let hint = format!("{}: {} more", name.label(), action);
        if !hints.contains(&hint) {
            hints.push(hint);
        }
        if hints.len() >= config.max_hints {
            break;
        }
    }
    hints
}

/// Pick the best-matching phase
///
/// Ties go to the phase declared first. A best score under
/// `min_phase_score` is reported as TRANSITION, without hints.
pub fn classify(exercise: &Exercise, angles: &AngleSet, config: &ScoringConfig) -> PhaseMatch {
    let mut best: Option<(&Phase, f32)> = None;
    for phase in &exercise.phases {
        let Some(score) = score_phase(phase, angles, config) else {
            continue;
        };
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((phase, score));
        }
    }

    match best {
        Some((phase, score)) if score > 0.0 && score >= config.min_phase_score => PhaseMatch {
            phase: phase.name.clone(),
            accuracy: score,
            hints: phase_hints(phase, angles, config),
        },
        Some((_, score)) => PhaseMatch {
            phase: TRANSITION.to_string(),
            accuracy: score,
            hints: Vec::new(),
        },
        None => PhaseMatch {
            phase: TRANSITION.to_string(),
            accuracy: 0.0,
            hints: Vec::new(),
        },
    }
}
