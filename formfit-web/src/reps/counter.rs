//! Phase/rep state machine
//!
//! Raw per-frame phase labels are noisy, so the counter only acts on a
//! *settled* phase: one that has been the raw label for `confirm_frames`
//! consecutive frames. A rep is one settled trip start → turn → start.
//!
//! ```text
//! READY ──▶ <phase> ◀──▶ TRANSITION
//!             │
//!   start ─▶ turn ─▶ start   = RepCompleted
//! ```

use tracing::debug;

use super::history::PhaseHistory;
use crate::config::RepCounterConfig;
use crate::exercise::{Exercise, RepCycle, READY, TRANSITION, UNKNOWN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepEvent {
    /// The settled phase changed
    PhaseChanged(String),
    /// A rep was confirmed; carries the new total
    RepCompleted(u32),
}

#[derive(Debug, Clone)]
pub struct RepCounter {
    /// `None` when the exercise cannot count reps
    cycle: Option<RepCycle>,
    history: PhaseHistory,
    confirm_frames: usize,
    /// Settled phase, `None` until the first one settles
    settled: Option<String>,
    /// Start phase seen since the session began
    started: bool,
    /// Turn phase reached since the last start
    armed: bool,
    reps: u32,
}

impl RepCounter {
    pub fn new(exercise: &Exercise, config: &RepCounterConfig) -> Self {
        let cycle = match exercise.rep_cycle() {
            Ok(cycle) => Some(cycle),
            Err(err) => {
                debug!(%err, "rep counting disabled for this exercise");
                None
            }
        };
        Self {
            cycle,
            history: PhaseHistory::new(config.history_len),
            confirm_frames: config.confirm_frames.max(1),
            settled: None,
            started: false,
            armed: false,
            reps: 0,
        }
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn counts_reps(&self) -> bool {
        self.cycle.is_some()
    }

    /// Settled phase, or READY before any phase has settled
    pub fn current_phase(&self) -> &str {
        self.settled.as_deref().unwrap_or(READY)
    }

    pub fn history(&self) -> &PhaseHistory {
        &self.history
    }

    /// Feed one raw phase label
    ///
    /// UNKNOWN labels (no judgment this frame) are ignored entirely.
    pub fn push(&mut self, label: &str) -> Vec<RepEvent> {
        let mut events = Vec::new();
        if label == UNKNOWN {
            return events;
        }

        self.history.push(label);
        let Some(stable) = self.history.settled(self.confirm_frames) else {
            return events;
        };
        if self.settled.as_deref() == Some(stable) {
            return events;
        }

        let stable = stable.to_string();
        debug!(phase = %stable, "phase settled");
        self.settled = Some(stable.clone());
        events.push(RepEvent::PhaseChanged(stable.clone()));

        let Some(cycle) = &self.cycle else {
            return events;
        };
        if stable == TRANSITION {
            return events;
        }

        if stable == cycle.start {
            if self.armed {
                self.reps += 1;
                self.armed = false;
                self.history.reset_to(&stable);
                debug!(reps = self.reps, "rep completed");
                events.push(RepEvent::RepCompleted(self.reps));
            }
            self.started = true;
        } else if stable == cycle.turn && self.started {
            self.armed = true;
        }

        events
    }

    /// Back to READY with zero reps
    pub fn reset(&mut self) {
        self.history.clear();
        self.settled = None;
        self.started = false;
        self.armed = false;
        self.reps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Catalog;

    fn counter(id: &str) -> RepCounter {
        let catalog = Catalog::builtin();
        RepCounter::new(catalog.find(id).unwrap(), &RepCounterConfig::default())
    }

    fn feed(counter: &mut RepCounter, labels: &[&str]) -> Vec<RepEvent> {
        labels.iter().flat_map(|l| counter.push(l)).collect()
    }

    fn reps_in(events: &[RepEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                RepEvent::RepCompleted(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    fn run(label: &str, n: usize) -> Vec<&str> {
        vec![label; n]
    }

    #[test]
    fn test_starts_ready() {
        let counter = counter("squat");
        assert_eq!(counter.current_phase(), READY);
        assert_eq!(counter.reps(), 0);
        assert!(counter.counts_reps());
    }

    #[test]
    fn test_squat_scenario_counts_on_return() {
        let mut counter = counter("squat");
        let labels = ["STANDING", "STANDING", "BOTTOM", "BOTTOM", "STANDING"];
        assert!(reps_in(&feed(&mut counter, &labels)).is_empty());
        assert_eq!(counter.push("STANDING"), vec![
            RepEvent::PhaseChanged("STANDING".into()),
            RepEvent::RepCompleted(1),
        ]);
        assert_eq!(counter.reps(), 1);
        assert_eq!(counter.history().len(), 1);
    }

    #[test]
    fn test_one_rep_per_full_alternation() {
        let mut counter = counter("squat");
        let mut labels = Vec::new();
        for _ in 0..3 {
            labels.extend(run("STANDING", 6));
            labels.extend(run("BOTTOM", 6));
        }
        labels.extend(run("STANDING", 6));
        assert_eq!(reps_in(&feed(&mut counter, &labels)), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_phase_never_counts() {
        let mut counter = counter("squat");
        let events = feed(&mut counter, &run("STANDING", 40));
        assert!(reps_in(&events).is_empty());
        assert_eq!(events, vec![RepEvent::PhaseChanged("STANDING".into())]);
    }

    #[test]
    fn test_single_frame_spike_is_ignored() {
        let mut counter = counter("squat");
        let mut labels = run("STANDING", 6);
        labels.push("BOTTOM");
        labels.extend(run("STANDING", 6));
        let events = feed(&mut counter, &labels);
        assert!(reps_in(&events).is_empty());
        assert_eq!(counter.current_phase(), "STANDING");
    }

    #[test]
    fn test_starting_at_turn_phase_needs_full_cycle() {
        let mut counter = counter("squat");
        let mut labels = run("BOTTOM", 4);
        labels.extend(run("STANDING", 4));
        assert!(reps_in(&feed(&mut counter, &labels)).is_empty());
        labels = run("BOTTOM", 4);
        labels.extend(run("STANDING", 4));
        assert_eq!(reps_in(&feed(&mut counter, &labels)), vec![1]);
    }

    #[test]
    fn test_transition_frames_do_not_break_cycle() {
        let mut counter = counter("push_up");
        let labels = [
            "UP", "UP", "TRANSITION", "TRANSITION", "DOWN", "DOWN",
            "TRANSITION", "TRANSITION", "TRANSITION", "UP", "UP",
        ];
        assert_eq!(reps_in(&feed(&mut counter, &labels)), vec![1]);
    }

    #[test]
    fn test_unknown_labels_are_skipped() {
        let mut counter = counter("squat");
        let labels = [
            "STANDING", "UNKNOWN", "STANDING", "BOTTOM", "UNKNOWN", "UNKNOWN", "BOTTOM",
            "STANDING", "STANDING",
        ];
        assert_eq!(reps_in(&feed(&mut counter, &labels)), vec![1]);
        assert!(counter.history().iter().all(|l| l != UNKNOWN));
    }

    #[test]
    fn test_hold_exercise_never_counts() {
        let mut counter = counter("plank");
        assert!(!counter.counts_reps());
        let events = feed(&mut counter, &run("HOLD", 20));
        assert_eq!(events, vec![RepEvent::PhaseChanged("HOLD".into())]);
        assert_eq!(counter.reps(), 0);
    }

    #[test]
    fn test_reset_returns_to_ready() {
        let mut counter = counter("squat");
        feed(&mut counter, &["STANDING", "STANDING", "BOTTOM", "BOTTOM", "STANDING", "STANDING"]);
        assert_eq!(counter.reps(), 1);
        counter.reset();
        assert_eq!(counter.reps(), 0);
        assert_eq!(counter.current_phase(), READY);
        assert!(counter.history().is_empty());
    }
}
