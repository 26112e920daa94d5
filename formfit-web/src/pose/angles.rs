//! Joint angle calculation using dot product
//!
//! Every angle is measured at a vertex joint between the rays to two
//! neighbouring joints, in degrees within [0, 180].

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::landmarks::*;

/// Added to the magnitude product so zero-length rays never divide by zero
const EPSILON: f32 = 1e-6;

/// Calculate the angle at `b` formed by rays to `a` and `c`
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// - 180° = straight line through `b`
/// - 0° = both rays point the same way
///
/// Degenerate rays give a degenerate but finite value, never a panic.
pub fn angle_at(a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> f32 {
    let v1 = a - b;
    let v2 = c - b;

    let cos_angle = (v1.dot(&v2) / (v1.norm() * v2.norm() + EPSILON)).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees()
}

/// Named joint angles derived per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleName {
    LeftElbow,
    RightElbow,
    LeftKnee,
    RightKnee,
    LeftHip,
    RightHip,
    LeftArmRaise,
    RightArmRaise,
    /// Mid-shoulder, mid-hip, mid-knee
    BodyLine,
}

impl AngleName {
    pub const ALL: [AngleName; 9] = [
        AngleName::LeftElbow,
        AngleName::RightElbow,
        AngleName::LeftKnee,
        AngleName::RightKnee,
        AngleName::LeftHip,
        AngleName::RightHip,
        AngleName::LeftArmRaise,
        AngleName::RightArmRaise,
        AngleName::BodyLine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AngleName::LeftElbow => "left_elbow",
            AngleName::RightElbow => "right_elbow",
            AngleName::LeftKnee => "left_knee",
            AngleName::RightKnee => "right_knee",
            AngleName::LeftHip => "left_hip",
            AngleName::RightHip => "right_hip",
            AngleName::LeftArmRaise => "left_arm_raise",
            AngleName::RightArmRaise => "right_arm_raise",
            AngleName::BodyLine => "body_line",
        }
    }

    /// Spoken form, e.g. "left arm raise"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Landmark triple (ray end, vertex, ray end) for the single-joint angles
    fn triple(&self) -> Option<(usize, usize, usize)> {
        match self {
            AngleName::LeftElbow => Some((LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST)),
            AngleName::RightElbow => Some((RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST)),
            AngleName::LeftKnee => Some((LEFT_HIP, LEFT_KNEE, LEFT_ANKLE)),
            AngleName::RightKnee => Some((RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE)),
            AngleName::LeftHip => Some((LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE)),
            AngleName::RightHip => Some((RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE)),
            AngleName::LeftArmRaise => Some((LEFT_HIP, LEFT_SHOULDER, LEFT_ELBOW)),
            AngleName::RightArmRaise => Some((RIGHT_HIP, RIGHT_SHOULDER, RIGHT_ELBOW)),
            AngleName::BodyLine => None,
        }
    }
}

impl fmt::Display for AngleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Angle name → degrees for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleSet(BTreeMap<AngleName, f32>);

impl AngleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: AngleName, degrees: f32) {
        self.0.insert(name, degrees);
    }

    pub fn get(&self, name: AngleName) -> Option<f32> {
        self.0.get(&name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AngleName, f32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Mean of two angles, if both are present
    pub fn mean(&self, a: AngleName, b: AngleName) -> Option<f32> {
        Some((self.get(a)? + self.get(b)?) / 2.0)
    }

    /// Absolute left/right difference, if both are present
    pub fn spread(&self, a: AngleName, b: AngleName) -> Option<f32> {
        Some((self.get(a)? - self.get(b)?).abs())
    }
}

impl FromIterator<(AngleName, f32)> for AngleSet {
    fn from_iter<T: IntoIterator<Item = (AngleName, f32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extract every named angle from a frame
///
/// Returns `None` when the frame lacks any body joint. Callers treat that
/// as "no judgment this frame", never as a zero angle.
pub fn extract_angles(frame: &Frame) -> Option<AngleSet> {
    if !frame.has_body() {
        return None;
    }

    let point = |i: usize| frame.get(i).map(Landmark::to_vector);

    let mut angles = AngleSet::new();
    for name in AngleName::ALL {
        let degrees = match name.triple() {
            Some((a, b, c)) => angle_at(point(a)?, point(b)?, point(c)?),
            None => {
                let mid = |l: usize, r: usize| -> Option<Vector2<f32>> {
                    Some(frame.get(l)?.midpoint(frame.get(r)?).to_vector())
                };
                angle_at(
                    mid(LEFT_SHOULDER, RIGHT_SHOULDER)?,
                    mid(LEFT_HIP, RIGHT_HIP)?,
                    mid(LEFT_KNEE, RIGHT_KNEE)?,
                )
            }
        };
        angles.insert(name, degrees);
    }
    Some(angles)
}
