//! Rule-based form checks
//!
//! One pure check per `FormRule`, each reading landmark geometry directly:
//! left/right symmetry, joint stacking and body-line alignment. Every
//! violated check appends one named error, most severe first.

use nalgebra::Vector2;

use crate::config::RuleTolerances;
use crate::exercise::FormRule;
use crate::pose::AngleName::*;
use crate::pose::*;

pub const ARMS_UNEVEN: &str = "Keep arms moving evenly";
pub const STACK_WRISTS: &str = "Stack wrists over elbows";
pub const WEIGHT_UNEVEN: &str = "Keep weight even on both legs";
pub const KNEES_PAST_TOES: &str = "Don't let knees go past toes";
pub const PUSH_UNEVEN: &str = "Push evenly with both arms";
pub const HIPS_SAG: &str = "Don't let hips sag";
pub const HIPS_PIKE: &str = "Don't pike up";
pub const FRONT_KNEE: &str = "Front knee past ankle";
pub const RAISE_UNEVEN: &str = "Raise both arms evenly";
pub const RAISE_TOO_HIGH: &str = "Don't raise above shoulder height";
pub const CURL_UNEVEN: &str = "Curl both arms evenly";
pub const ELBOW_DRIFT: &str = "Keep elbow pinned to your side";

/// Knee angle below which knee tracking is judged
const BENT_KNEE_DEG: f32 = 140.0;

/// Torso tilt from vertical separating upright from horizontal poses
const UPRIGHT_MAX_TILT_DEG: f32 = 50.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleVerdict {
    pub errors: Vec<&'static str>,
    pub in_position: Option<bool>,
}

impl RuleVerdict {
    fn flag(&mut self, violated: bool, error: &'static str) {
        if violated && !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }
}

/// Run the checks for `rule`
///
/// The frame must already have passed `Frame::has_body`; a missing joint
/// simply skips the check that needs it.
pub fn check(rule: FormRule, frame: &Frame, angles: &AngleSet, tol: &RuleTolerances) -> RuleVerdict {
    let mut verdict = RuleVerdict::default();
    let exceeds = |value: Option<f32>, limit: f32| value.map_or(false, |v| v > limit);

    match rule {
        FormRule::ShoulderPress => {
            verdict.in_position = upright(frame);
            verdict.flag(
                exceeds(angles.spread(LeftElbow, RightElbow), tol.arm_symmetry_deg),
                ARMS_UNEVEN,
            );
            let unstacked = |elbow: usize, wrist: usize| {
                exceeds(horizontal_gap(frame, elbow, wrist), tol.stack_offset)
            };
            verdict.flag(
                unstacked(LEFT_ELBOW, LEFT_WRIST) || unstacked(RIGHT_ELBOW, RIGHT_WRIST),
                STACK_WRISTS,
            );
        }
        FormRule::Squat => {
            verdict.in_position = upright(frame);
            verdict.flag(
                exceeds(angles.spread(LeftKnee, RightKnee), tol.leg_symmetry_deg),
                WEIGHT_UNEVEN,
            );
            let bent = angles
                .mean(LeftKnee, RightKnee)
                .map_or(false, |knee| knee < BENT_KNEE_DEG);
            let past = |knee: usize, ankle: usize| {
                exceeds(horizontal_gap(frame, knee, ankle), tol.knee_over_toe_offset)
            };
            verdict.flag(
                bent && (past(LEFT_KNEE, LEFT_ANKLE) || past(RIGHT_KNEE, RIGHT_ANKLE)),
                KNEES_PAST_TOES,
            );
        }
        FormRule::PushUp => {
            verdict.in_position = upright(frame).map(|up| !up);
            verdict.flag(
                exceeds(angles.spread(LeftElbow, RightElbow), tol.arm_symmetry_deg),
                PUSH_UNEVEN,
            );
            body_line(&mut verdict, frame, tol);
        }
        FormRule::Lunge => {
            verdict.in_position = upright(frame);
            if let Some((knee, ankle, angle)) = front_leg(frame, angles) {
                verdict.flag(
                    angle < BENT_KNEE_DEG
                        && exceeds(horizontal_gap(frame, knee, ankle), tol.knee_over_toe_offset),
                    FRONT_KNEE,
                );
            }
        }
        FormRule::LateralRaise => {
            verdict.in_position = upright(frame);
            verdict.flag(
                exceeds(angles.spread(LeftArmRaise, RightArmRaise), tol.arm_symmetry_deg),
                RAISE_UNEVEN,
            );
            verdict.flag(
                exceeds(angles.mean(LeftArmRaise, RightArmRaise), tol.raise_max_deg),
                RAISE_TOO_HIGH,
            );
        }
        FormRule::BicepCurl => {
            verdict.in_position = upright(frame);
            verdict.flag(
                exceeds(angles.spread(LeftElbow, RightElbow), tol.curl_symmetry_deg),
                CURL_UNEVEN,
            );
            verdict.flag(
                exceeds(angles.get(LeftArmRaise), tol.elbow_pin_max_deg)
                    || exceeds(angles.get(RightArmRaise), tol.elbow_pin_max_deg),
                ELBOW_DRIFT,
            );
        }
        FormRule::Plank => {
            verdict.in_position = upright(frame).map(|up| !up);
            body_line(&mut verdict, frame, tol);
        }
        FormRule::Generic => {}
    }

    verdict
}

fn mid(frame: &Frame, left: usize, right: usize) -> Option<Vector2<f32>> {
    Some(frame.get(left)?.midpoint(frame.get(right)?).to_vector())
}

fn horizontal_gap(frame: &Frame, a: usize, b: usize) -> Option<f32> {
    Some((frame.get(a)?.x - frame.get(b)?.x).abs())
}

/// Shoulders above hips with the torso close to vertical
fn upright(frame: &Frame) -> Option<bool> {
    let torso = mid(frame, LEFT_SHOULDER, RIGHT_SHOULDER)? - mid(frame, LEFT_HIP, RIGHT_HIP)?;
    // y grows downward, so shoulders above hips means a negative dy
    let tilt = torso.x.abs().atan2(-torso.y).to_degrees();
    Some(torso.y < 0.0 && tilt <= UPRIGHT_MAX_TILT_DEG)
}

/// Shoulder-hip-ankle line for plank-like holds
///
/// Hips below the shoulder-to-ankle line sag, hips above it pike.
fn body_line(verdict: &mut RuleVerdict, frame: &Frame, tol: &RuleTolerances) {
    let (Some(shoulder), Some(hip), Some(ankle)) = (
        mid(frame, LEFT_SHOULDER, RIGHT_SHOULDER),
        mid(frame, LEFT_HIP, RIGHT_HIP),
        mid(frame, LEFT_ANKLE, RIGHT_ANKLE),
    ) else {
        return;
    };

    if angle_at(shoulder, hip, ankle) >= tol.body_line_min_deg {
        return;
    }

    let line = ankle - shoulder;
    let offset = hip - shoulder;
    // Normalise for which side of the frame the head is on
    let below = line.perp(&offset) * line.x.signum() > 0.0;
    verdict.flag(below, HIPS_SAG);
    verdict.flag(!below, HIPS_PIKE);
}

/// The forward leg in a lunge: its knee sits furthest ahead of the hips
fn front_leg(frame: &Frame, angles: &AngleSet) -> Option<(usize, usize, f32)> {
    let hips = mid(frame, LEFT_HIP, RIGHT_HIP)?;
    let reach = |knee: usize| frame.get(knee).map(|k| (k.x - hips.x).abs());
    if reach(LEFT_KNEE)? >= reach(RIGHT_KNEE)? {
        Some((LEFT_KNEE, LEFT_ANKLE, angles.get(LeftKnee)?))
    } else {
        Some((RIGHT_KNEE, RIGHT_ANKLE, angles.get(RightKnee)?))
    }
}
