//! Movement detection over a short rolling window
//!
//! The user counts as moving when any tracked angle has swung more than
//! the exercise's threshold within the window.

use std::collections::VecDeque;

use crate::pose::{AngleName, AngleSet};

/// Rolling window of timestamped angle samples
#[derive(Debug, Clone)]
pub struct MovementTracker {
    window_ms: u64,
    samples: VecDeque<(u64, AngleSet)>,
}

impl MovementTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms: window_ms.max(1),
            samples: VecDeque::new(),
        }
    }

    /// Record a sample at `now_ms` and report whether the user is moving
    ///
    /// Samples older than the window are evicted first. A single sample
    /// never counts as movement.
    pub fn update(
        &mut self,
        now_ms: u64,
        angles: &AngleSet,
        tracked: &[AngleName],
        threshold_deg: f32,
    ) -> bool {
        self.samples.push_back((now_ms, angles.clone()));
        let cutoff = now_ms.saturating_sub(self.window_ms);
        while let Some((t, _)) = self.samples.front() {
            if *t >= cutoff {
                break;
            }
            self.samples.pop_front();
        }

        tracked
            .iter()
            .any(|&name| self.swing(name).is_some_and(|swing| swing > threshold_deg))
    }

    /// max − min of one angle across the window
    pub fn swing(&self, name: AngleName) -> Option<f32> {
        let mut values = self.samples.iter().filter_map(|(_, set)| set.get(name));
        let first = values.next()?;
        let (lo, hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(hi - lo)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
