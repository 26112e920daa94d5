//! Pose module - landmark frames, joint angles and smoothing
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod landmarks;
mod smoothing;

pub use angles::{angle_at, extract_angles, AngleName, AngleSet};
pub use landmarks::{
    Frame, Landmark,
    LANDMARK_COUNT, MIN_LANDMARKS, BODY_LANDMARKS,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};
pub use smoothing::{JointFilter, LandmarkSmoother};
