//! Landmark jitter smoothing
//!
//! A one-euro filter per joint, run on the 2-D point rather than on each
//! axis: the cutoff adapts to the joint's speed, so a still joint is held
//! steady and a fast one follows with little lag.
//! Off by default; the pose estimator usually smooths already.

use std::f32::consts::PI;

use nalgebra::Vector2;

use super::landmarks::{Frame, Landmark, BODY_LANDMARKS, LANDMARK_COUNT};
use crate::config::SmoothingConfig;

/// Derivative cutoff (Hz) used for the speed estimate
const SPEED_CUTOFF_HZ: f32 = 1.0;

/// Blend weight for a low-pass step of `dt` seconds at `cutoff` Hz
fn alpha(dt: f32, cutoff: f32) -> f32 {
    let r = 2.0 * PI * cutoff * dt;
    r / (r + 1.0)
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    t: f64,
    position: Vector2<f32>,
    velocity: Vector2<f32>,
}

/// Speed-adaptive low-pass filter for one joint
#[derive(Debug, Clone)]
pub struct JointFilter {
    /// Cutoff (Hz) at rest - lower = steadier
    min_cutoff: f32,
    /// Cutoff gain per unit of speed - higher = less lag when moving
    beta: f32,
    last: Option<Sample>,
}

impl JointFilter {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            last: None,
        }
    }

    /// Filter a position observed at `t` seconds
    ///
    /// The first sample passes through; a non-advancing clock repeats the
    /// previous output.
    pub fn filter(&mut self, t: f64, position: Vector2<f32>) -> Vector2<f32> {
        let Some(last) = self.last else {
            self.last = Some(Sample {
                t,
                position,
                velocity: Vector2::zeros(),
            });
            return position;
        };

        let dt = (t - last.t) as f32;
        if dt <= 0.0 {
            return last.position;
        }

        let raw_velocity = (position - last.position) / dt;
        let velocity = last.velocity.lerp(&raw_velocity, alpha(dt, SPEED_CUTOFF_HZ));
        let cutoff = self.min_cutoff + self.beta * velocity.norm();
        let smoothed = last.position.lerp(&position, alpha(dt, cutoff));

        self.last = Some(Sample {
            t,
            position: smoothed,
            velocity,
        });
        smoothed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }
}

/// One filter per body landmark
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    filters: Vec<JointFilter>,
}

impl LandmarkSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            filters: vec![JointFilter::new(config.min_cutoff, config.beta); LANDMARK_COUNT],
        }
    }

    /// Smooth the body joints of `frame` in place
    ///
    /// Missing or non-finite joints are left untouched and do not advance
    /// their filters.
    pub fn apply(&mut self, frame: &mut Frame, now_ms: u64) {
        let t = now_ms as f64 / 1000.0;
        let landmarks = frame.landmarks_mut();
        for &index in BODY_LANDMARKS.iter() {
            let (Some(point), Some(filter)) = (landmarks.get_mut(index), self.filters.get_mut(index))
            else {
                continue;
            };
            if !point.is_finite() {
                continue;
            }
            let smoothed = filter.filter(t, point.to_vector());
            *point = Landmark::new(smoothed.x, smoothed.y);
        }
    }

    /// True once any joint has seen a sample
    pub fn is_primed(&self) -> bool {
        self.filters.iter().any(JointFilter::is_primed)
    }

    pub fn reset(&mut self) {
        self.filters.iter_mut().for_each(JointFilter::reset);
    }
}
