//! Synthetic landmark frames with known joint angles

use nalgebra::{Rotation2, Vector2};

use crate::pose::*;

const SEGMENT: f32 = 0.12;
const SHIN: f32 = 0.2;

fn at(points: &mut [Landmark], index: usize, x: f32, y: f32) {
    points[index] = Landmark::new(x, y);
}

fn blank() -> Vec<Landmark> {
    vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT]
}

/// Standing with knees at the given angles, side-on, hips sitting back
pub fn squat(left_knee: f32, right_knee: f32) -> Frame {
    let mut p = blank();
    for (knee_deg, x, hip, knee, ankle, shoulder, elbow, wrist) in [
        (left_knee, 0.48, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
        (right_knee, 0.52, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
    ] {
        let theta = knee_deg.to_radians();
        let (kx, ky) = (x, 0.7);
        let (hx, hy) = (kx - SHIN * theta.sin(), ky + SHIN * theta.cos());
        at(&mut p, ankle, kx, ky + SHIN);
        at(&mut p, knee, kx, ky);
        at(&mut p, hip, hx, hy);
        at(&mut p, shoulder, hx + 0.03, hy - 0.3);
        at(&mut p, elbow, hx + 0.03, hy - 0.3 + SEGMENT);
        at(&mut p, wrist, hx + 0.03, hy - 0.3 + 2.0 * SEGMENT);
    }
    Frame::new(p)
}

/// Standing press with forearms vertical and the given elbow angles
pub fn press(left_elbow: f32, right_elbow: f32) -> Frame {
    let mut p = blank();
    for (elbow_deg, side, sx, shoulder, elbow, wrist, hip, knee, ankle) in [
        (left_elbow, 1.0, 0.42, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
        (right_elbow, -1.0, 0.58, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
    ] {
        let theta = elbow_deg.to_radians();
        let (ex, ey) = (sx - side * SEGMENT * theta.sin(), 0.3 + SEGMENT * theta.cos());
        at(&mut p, shoulder, sx, 0.3);
        at(&mut p, elbow, ex, ey);
        at(&mut p, wrist, ex, ey - SEGMENT);
        at(&mut p, hip, sx + side * 0.02, 0.55);
        at(&mut p, knee, sx + side * 0.02, 0.72);
        at(&mut p, ankle, sx + side * 0.02, 0.9);
    }
    Frame::new(p)
}

/// Side-on forearm plank, head to the left; positive `hip_drop` sags
pub fn plank(hip_drop: f32) -> Frame {
    let mut p = blank();
    for (shoulder, elbow, wrist, hip, knee, ankle) in [
        (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
        (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
    ] {
        at(&mut p, shoulder, 0.3, 0.5);
        at(&mut p, elbow, 0.3, 0.65);
        at(&mut p, wrist, 0.2, 0.65);
        at(&mut p, hip, 0.55, 0.5 + hip_drop);
        at(&mut p, knee, 0.72, 0.5);
        at(&mut p, ankle, 0.9, 0.5);
    }
    Frame::new(p)
}

/// Place an arm: upper arm from `shoulder` along `upper`, forearm bent to
/// `elbow_deg`
fn arm(
    p: &mut [Landmark],
    (shoulder, elbow, wrist): (usize, usize, usize),
    from: Vector2<f32>,
    upper: Vector2<f32>,
    elbow_deg: f32,
) {
    let e = from + upper * SEGMENT;
    let w = e + Rotation2::new(elbow_deg.to_radians()) * -upper * SEGMENT;
    at(p, shoulder, from.x, from.y);
    at(p, elbow, e.x, e.y);
    at(p, wrist, w.x, w.y);
}

/// Upper arm swung out from the side by `deg`, 0 = hanging
fn swung(side: f32, deg: f32) -> Vector2<f32> {
    let theta = deg.to_radians();
    Vector2::new(-side * theta.sin(), theta.cos())
}

/// Upright stance with hips straight below the shoulders
fn stand(p: &mut [Landmark]) {
    for (sx, hip, knee, ankle) in [
        (0.42, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
        (0.58, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
    ] {
        at(p, hip, sx, 0.55);
        at(p, knee, sx, 0.72);
        at(p, ankle, sx, 0.9);
    }
}

/// Facing the camera, straight arms raised sideways to the given angles
pub fn raise(left_deg: f32, right_deg: f32) -> Frame {
    let mut p = blank();
    stand(&mut p);
    arm(&mut p, (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST), Vector2::new(0.42, 0.3), swung(1.0, left_deg), 180.0);
    arm(&mut p, (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST), Vector2::new(0.58, 0.3), swung(-1.0, right_deg), 180.0);
    Frame::new(p)
}

/// Facing the camera mid-curl; `drift` swings both upper arms off the torso
pub fn curl(left_elbow: f32, right_elbow: f32, drift: f32) -> Frame {
    let mut p = blank();
    stand(&mut p);
    arm(&mut p, (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST), Vector2::new(0.42, 0.3), swung(1.0, drift), left_elbow);
    arm(&mut p, (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST), Vector2::new(0.58, 0.3), swung(-1.0, drift), right_elbow);
    Frame::new(p)
}

/// Side-on lunge facing right, left leg forward with its ankle at x = 0.65
pub fn lunge(front_knee_x: f32) -> Frame {
    let mut p = blank();
    for (shoulder, elbow, wrist, hip) in [
        (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP),
        (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST, RIGHT_HIP),
    ] {
        arm(&mut p, (shoulder, elbow, wrist), Vector2::new(0.5, 0.25), Vector2::new(0.0, 1.0), 180.0);
        at(&mut p, hip, 0.5, 0.55);
    }
    at(&mut p, LEFT_KNEE, front_knee_x, 0.72);
    at(&mut p, LEFT_ANKLE, 0.65, 0.9);
    // Back knee sits well past its own ankle
    at(&mut p, RIGHT_KNEE, 0.4, 0.85);
    at(&mut p, RIGHT_ANKLE, 0.25, 0.9);
    Frame::new(p)
}

/// Side-on push-up, head to the left, body as in `plank`
pub fn push_up(left_elbow: f32, right_elbow: f32, hip_drop: f32) -> Frame {
    let mut p = plank(hip_drop).landmarks().to_vec();
    let down = Vector2::new(0.0, 1.0);
    arm(&mut p, (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST), Vector2::new(0.3, 0.5), down, left_elbow);
    arm(&mut p, (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST), Vector2::new(0.3, 0.5), down, right_elbow);
    Frame::new(p)
}
