//! Landmark frames
//!
//! One `Frame` per processed video frame, in MediaPipe Pose order
//! (33 points, normalized image coordinates).

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Full MediaPipe Pose landmark count
pub const LANDMARK_COUNT: usize = 33;

/// Frames shorter than this cannot reach the ankles
pub const MIN_LANDMARKS: usize = RIGHT_ANKLE + 1;

/// The twelve joints the engine reads
pub const BODY_LANDMARKS: [usize; 12] = [
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
];

// ============================================================================
// LANDMARK DATA STRUCTURES
// ============================================================================

/// A single 2D landmark (normalized coordinates, y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vector(self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Midpoint between two landmarks
    pub fn midpoint(self, other: Landmark) -> Landmark {
        Landmark::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Ordered landmarks for one video frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    landmarks: Vec<Landmark>,
}

impl Frame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Build a frame from a flat array as delivered from JavaScript
    ///
    /// `stride` is 2 for `[x, y, ...]` or 3 for `[x, y, z, ...]`; any extra
    /// components are ignored. Returns `None` when the length is not a
    /// multiple of the stride.
    pub fn from_flat(data: &[f32], stride: usize) -> Option<Self> {
        if stride < 2 || data.len() % stride != 0 {
            return None;
        }
        let landmarks = data
            .chunks_exact(stride)
            .map(|c| Landmark::new(c[0], c[1]))
            .collect();
        Some(Self { landmarks })
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Landmark at `index`, or `None` if missing or not a finite point
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied().filter(Landmark::is_finite)
    }

    /// True when every body joint the engine reads is present
    pub fn has_body(&self) -> bool {
        self.len() >= MIN_LANDMARKS && BODY_LANDMARKS.iter().all(|&i| self.get(i).is_some())
    }

    pub(crate) fn landmarks_mut(&mut self) -> &mut [Landmark] {
        &mut self.landmarks
    }
}
