//! Exercise definitions
//!
//! An exercise is immutable once loaded: named phases (angle range
//! predicates), the two-phase order that makes up one rep, and the motion
//! threshold used to decide whether the user is moving.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::pose::AngleName;

/// No phase predicate matched well enough
pub const TRANSITION: &str = "TRANSITION";
/// Landmarks missing, no judgment possible
pub const UNKNOWN: &str = "UNKNOWN";
/// Session started, no frame evaluated yet
pub const READY: &str = "READY";

const RESERVED_PHASES: [&str; 3] = [TRANSITION, UNKNOWN, READY];

/// Inclusive angle range in degrees, written `[min, max]` in JSON
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, degrees: f32) -> bool {
        degrees >= self.min && degrees <= self.max
    }

    /// Degrees outside the range (0 when inside), negative when below
    pub fn deviation(&self, degrees: f32) -> f32 {
        if degrees < self.min {
            degrees - self.min
        } else if degrees > self.max {
            degrees - self.max
        } else {
            0.0
        }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && self.min >= 0.0
            && self.max <= 180.0
    }
}

impl From<(f32, f32)> for AngleRange {
    fn from((min, max): (f32, f32)) -> Self {
        Self { min, max }
    }
}

impl From<AngleRange> for (f32, f32) {
    fn from(range: AngleRange) -> Self {
        (range.min, range.max)
    }
}

/// One named pose configuration within a rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub angles: BTreeMap<AngleName, AngleRange>,
}

impl Phase {
    pub fn new(name: &str, ranges: &[(AngleName, f32, f32)]) -> Self {
        Self {
            name: name.to_string(),
            angles: ranges
                .iter()
                .map(|&(angle, min, max)| (angle, AngleRange::new(min, max)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Shoulders,
    Chest,
    Arms,
    Legs,
    Core,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Shoulders => "Shoulders",
            Category::Chest => "Chest",
            Category::Arms => "Arms",
            Category::Legs => "Legs",
            Category::Core => "Core",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Which rule-based checks apply to an exercise
///
/// `Generic` exercises get their errors from range-scored joint hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormRule {
    ShoulderPress,
    Squat,
    PushUp,
    Lunge,
    LateralRaise,
    BicepCurl,
    Plank,
    #[default]
    Generic,
}

/// The two phases whose alternation makes one rep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepCycle {
    /// Where a rep starts and ends
    pub start: String,
    /// The turning point in between
    pub turn: String,
}

fn default_movement_threshold() -> f32 {
    15.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub muscles: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tips: Vec<String>,
    /// Spoken names a voice agent may use
    #[serde(default)]
    pub aliases: Vec<String>,
    pub phases: Vec<Phase>,
    /// Exactly two phase names for rep counting; empty for holds
    #[serde(default)]
    pub phase_order: Vec<String>,
    /// Degrees of joint travel that count as moving
    #[serde(default = "default_movement_threshold")]
    pub movement_threshold: f32,
    #[serde(default)]
    pub rule: FormRule,
}

impl Exercise {
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Structural checks: fatal for the exercise
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.phases.is_empty() {
            return Err(CatalogError::NoPhases { id: self.id.clone() });
        }
        let mut seen = HashSet::with_capacity(self.phases.len());
        for phase in &self.phases {
            if !seen.insert(phase.name.as_str()) {
                return Err(CatalogError::DuplicatePhase {
                    id: self.id.clone(),
                    phase: phase.name.clone(),
                });
            }
            if RESERVED_PHASES.contains(&phase.name.as_str()) {
                return Err(CatalogError::ReservedPhase {
                    id: self.id.clone(),
                    phase: phase.name.clone(),
                });
            }
            if phase.angles.is_empty() {
                return Err(CatalogError::EmptyPhase {
                    id: self.id.clone(),
                    phase: phase.name.clone(),
                });
            }
            if let Some((angle, range)) = phase.angles.iter().find(|(_, r)| !r.is_valid()) {
                return Err(CatalogError::InvalidRange {
                    id: self.id.clone(),
                    phase: phase.name.clone(),
                    angle: angle.to_string(),
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    /// Resolve the rep cycle
    ///
    /// Fails unless the phase order names exactly two distinct declared
    /// phases. A failure disables rep counting only.
    pub fn rep_cycle(&self) -> Result<RepCycle, CatalogError> {
        let invalid = || CatalogError::InvalidPhaseOrder {
            id: self.id.clone(),
            order: self.phase_order.clone(),
        };

        let [start, turn] = self.phase_order.as_slice() else {
            return Err(invalid());
        };
        if start == turn || self.phase(start).is_none() || self.phase(turn).is_none() {
            return Err(invalid());
        }
        Ok(RepCycle {
            start: start.clone(),
            turn: turn.clone(),
        })
    }

    /// True for static holds that never count reps
    pub fn is_hold(&self) -> bool {
        self.rep_cycle().is_err()
    }

    /// Every angle any phase reads
    pub fn tracked_angles(&self) -> Vec<AngleName> {
        let mut names: Vec<AngleName> = self
            .phases
            .iter()
            .flat_map(|p| p.angles.keys().copied())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
