//! Rolling phase-label history
//!
//! Keeps the last N raw labels in chronological order.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct PhaseHistory {
    labels: VecDeque<String>,
    capacity: usize,
}

impl PhaseHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a label, dropping the oldest once full
    pub fn push(&mut self, label: &str) {
        if self.labels.len() == self.capacity {
            self.labels.pop_front();
        }
        self.labels.push_back(label.to_string());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn latest(&self) -> Option<&str> {
        self.labels.back().map(String::as_str)
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// The label shared by the last `frames` entries, if they all agree
    pub fn settled(&self, frames: usize) -> Option<&str> {
        if frames == 0 || self.labels.len() < frames {
            return None;
        }
        let latest = self.latest()?;
        self.labels
            .iter()
            .rev()
            .take(frames)
            .all(|l| l == latest)
            .then_some(latest)
    }

    /// Forget everything except `label`
    pub fn reset_to(&mut self, label: &str) {
        self.labels.clear();
        self.labels.push_back(label.to_string());
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
