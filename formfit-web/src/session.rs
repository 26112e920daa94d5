//! Coaching session - one exercise, one frame stream
//!
//! Lifecycle: `start(exercise)` → `feed(frame)*` → `finish()` or `abort()`.
//! Frames must be fed serially; the session holds all rolling state
//! (phase history, rep count, motion baseline, speech cooldown).

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::evaluator::{EvaluationResult, FormEvaluator};
use crate::events::SessionEvent;
use crate::exercise::{Exercise, READY};
use crate::feedback::{FeedbackThrottler, SpeakRequest, SpeechSink};
use crate::pose::{AngleName, Frame, LandmarkSmoother};
use crate::reps::{MovementTracker, RepCounter, RepEvent};

/// Result of feeding one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub result: EvaluationResult,
    pub events: Vec<SessionEvent>,
}

/// State that lives exactly as long as one exercise
struct ActiveExercise {
    exercise: Exercise,
    tracked: Vec<AngleName>,
    counter: RepCounter,
    movement: MovementTracker,
    last_pose_update: Option<u64>,
}

pub struct CoachSession<S: SpeechSink> {
    config: EngineConfig,
    evaluator: FormEvaluator,
    throttler: FeedbackThrottler<S>,
    smoother: LandmarkSmoother,
    active: Option<ActiveExercise>,
}

fn spoken(request: SpeakRequest) -> SessionEvent {
    SessionEvent::SpeakRequested {
        message: request.message,
        forced: request.forced,
    }
}

impl<S: SpeechSink> CoachSession<S> {
    /// `seed` drives affirmation choice only
    pub fn new(sink: S, config: EngineConfig, seed: u64) -> Self {
        Self {
            evaluator: FormEvaluator::new(config.scoring.clone(), config.rules.clone()),
            throttler: FeedbackThrottler::new(sink, config.feedback.clone(), seed),
            smoother: LandmarkSmoother::new(&config.smoothing),
            active: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn exercise(&self) -> Option<&Exercise> {
        self.active.as_ref().map(|a| &a.exercise)
    }

    pub fn reps(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.counter.reps())
    }

    pub fn current_phase(&self) -> &str {
        self.active.as_ref().map_or(READY, |a| a.counter.current_phase())
    }

    pub fn throttler(&self) -> &FeedbackThrottler<S> {
        &self.throttler
    }

    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.throttler.set_enabled(enabled);
    }

    /// Begin coaching `exercise`, replacing any running exercise silently
    pub fn start(&mut self, exercise: Exercise) -> Vec<SessionEvent> {
        if self.active.is_some() {
            self.abort();
        }
        self.throttler.reset();
        self.smoother.reset();

        info!(exercise = %exercise.id, "session started");
        let mut events = vec![SessionEvent::ExerciseSelected {
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
        }];
        events.extend(self.throttler.announce_start(&exercise.name).map(spoken));

        self.active = Some(ActiveExercise {
            tracked: exercise.tracked_angles(),
            counter: RepCounter::new(&exercise, &self.config.reps),
            movement: MovementTracker::new(self.config.movement_window_ms),
            last_pose_update: None,
            exercise,
        });
        events
    }

    /// Evaluate one frame; `None` means the pose source saw nobody
    ///
    /// Returns `None` when no exercise is running.
    pub fn feed(&mut self, frame: Option<Frame>, now_ms: u64) -> Option<FrameOutcome> {
        let active = self.active.as_mut()?;

        let mut frame = frame;
        if self.config.smoothing.enabled {
            if let Some(frame) = frame.as_mut() {
                self.smoother.apply(frame, now_ms);
            }
        }

        let mut result = self.evaluator.evaluate(frame.as_ref(), &active.exercise);
        if !result.is_degraded() && !active.exercise.is_hold() {
            result.is_moving = Some(active.movement.update(
                now_ms,
                &result.angles,
                &active.tracked,
                active.exercise.movement_threshold,
            ));
        }

        let mut events = Vec::new();
        for event in active.counter.push(&result.phase) {
            match event {
                RepEvent::PhaseChanged(phase) => events.push(SessionEvent::PhaseChanged { phase }),
                RepEvent::RepCompleted(reps) => {
                    events.push(SessionEvent::RepCounted { reps });
                    events.extend(self.throttler.announce_rep(reps).map(spoken));
                }
            }
        }
        events.extend(self.throttler.on_evaluation(&result, now_ms).map(spoken));

        let interval = self.config.feedback.pose_update_interval_ms;
        let due = active
            .last_pose_update
            .map_or(true, |at| now_ms.saturating_sub(at) >= interval);
        if due {
            active.last_pose_update = Some(now_ms);
            events.push(SessionEvent::PoseUpdate {
                reps: active.counter.reps(),
                phase: result.phase.clone(),
                is_correct: result.is_correct,
                errors: result.errors.clone(),
                is_moving: result.is_moving,
                accuracy: result.accuracy,
            });
        }

        Some(FrameOutcome { result, events })
    }

    /// Announce the final count and tear down; no-op when idle
    pub fn finish(&mut self) -> Vec<SessionEvent> {
        let Some(active) = self.active.take() else {
            return Vec::new();
        };
        let reps = active.counter.reps();
        info!(exercise = %active.exercise.id, reps, "session finished");

        let mut events: Vec<SessionEvent> = self
            .throttler
            .announce_end(&active.exercise.name, reps)
            .map(spoken)
            .into_iter()
            .collect();
        events.push(SessionEvent::SessionEnded {
            exercise_id: active.exercise.id,
            reps,
        });
        self.smoother.reset();
        events
    }

    /// Stop immediately without speaking; no-op when idle
    pub fn abort(&mut self) -> Vec<SessionEvent> {
        let Some(active) = self.active.take() else {
            return Vec::new();
        };
        debug!(exercise = %active.exercise.id, "session aborted");
        self.throttler.cancel();
        self.smoother.reset();
        vec![SessionEvent::SessionEnded {
            exercise_id: active.exercise.id,
            reps: active.counter.reps(),
        }]
    }

    pub fn on_utterance_start(&mut self, id: u64) {
        self.throttler.on_utterance_start(id);
    }

    pub fn on_utterance_end(&mut self, id: u64, now_ms: u64) {
        self.throttler.on_utterance_end(id, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothingConfig;
    use crate::evaluator::test_poses::{plank, squat};
    use crate::evaluator::CANT_SEE_ERROR;
    use crate::exercise::{Catalog, UNKNOWN};
    use crate::feedback::RecordingSink;
    use crate::pose::{Landmark, MIN_LANDMARKS};

    const FRAME_MS: u64 = 33;

    fn session() -> CoachSession<RecordingSink> {
        CoachSession::new(RecordingSink::default(), EngineConfig::default(), 42)
    }

    fn smoothed_session() -> CoachSession<RecordingSink> {
        let config = EngineConfig {
            smoothing: SmoothingConfig {
                enabled: true,
                ..SmoothingConfig::default()
            },
            ..EngineConfig::default()
        };
        CoachSession::new(RecordingSink::default(), config, 42)
    }

    fn exercise(id: &str) -> Exercise {
        Catalog::builtin().find(id).unwrap().clone()
    }

    fn reps_in(events: &[SessionEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::RepCounted { reps } => Some(*reps),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_announces_exercise() {
        let mut s = session();
        let events = s.start(exercise("squat"));
        assert_eq!(events[0], SessionEvent::ExerciseSelected {
            exercise_id: "squat".into(),
            exercise_name: "Squat".into(),
        });
        assert_eq!(events[1], SessionEvent::SpeakRequested {
            message: "Starting Squat. Get into position and begin when ready!".into(),
            forced: true,
        });
        assert_eq!(s.current_phase(), READY);
    }

    #[test]
    fn test_squat_end_to_end() {
        let mut s = session();
        s.start(exercise("squat"));

        let mut phases = Vec::new();
        let mut all_events = Vec::new();
        for (i, knee) in [175.0, 175.0, 95.0, 95.0, 175.0, 175.0].into_iter().enumerate() {
            let outcome = s.feed(Some(squat(knee, knee)), i as u64 * FRAME_MS).unwrap();
            phases.push(outcome.result.phase.clone());
            if i < 5 {
                assert!(reps_in(&outcome.events).is_empty());
            }
            all_events.extend(outcome.events);
        }

        assert_eq!(phases, ["STANDING", "STANDING", "BOTTOM", "BOTTOM", "STANDING", "STANDING"]);
        assert_eq!(reps_in(&all_events), vec![1]);
        assert!(all_events.contains(&SessionEvent::SpeakRequested {
            message: "One!".into(),
            forced: true,
        }));
        assert_eq!(s.reps(), 1);
    }

    #[test]
    fn test_missing_landmarks_do_not_corrupt_counting() {
        let mut s = session();
        s.start(exercise("squat"));
        let short = Frame::new(vec![Landmark::new(0.5, 0.5); MIN_LANDMARKS - 1]);

        let mut t = 0;
        let mut next = |s: &mut CoachSession<RecordingSink>, frame: Option<Frame>| {
            t += FRAME_MS;
            s.feed(frame, t).unwrap()
        };

        next(&mut s, Some(squat(175.0, 175.0)));
        next(&mut s, Some(squat(175.0, 175.0)));
        next(&mut s, Some(squat(95.0, 95.0)));

        let degraded = next(&mut s, Some(short));
        assert!(!degraded.result.is_correct);
        assert_eq!(degraded.result.phase, UNKNOWN);
        assert_eq!(degraded.result.errors, vec![CANT_SEE_ERROR]);
        assert!(degraded.result.angles.is_empty());
        assert!(next(&mut s, None).result.is_degraded());

        next(&mut s, Some(squat(95.0, 95.0)));
        next(&mut s, Some(squat(175.0, 175.0)));
        let last = next(&mut s, Some(squat(175.0, 175.0)));
        assert_eq!(reps_in(&last.events), vec![1]);
    }

    #[test]
    fn test_pose_updates_are_rate_limited() {
        let mut s = session();
        s.start(exercise("squat"));
        let count = (0..60u64)
            .map(|i| s.feed(Some(squat(175.0, 175.0)), i * FRAME_MS).unwrap())
            .flat_map(|o| o.events)
            .filter(|e| matches!(e, SessionEvent::PoseUpdate { .. }))
            .count();
        // Frames run 0..=1947 ms: updates at 0 ms and 1023 ms
        assert_eq!(count, 2);
    }

    #[test]
    fn test_smoothed_squat_lags_then_counts() {
        let mut s = smoothed_session();
        s.start(exercise("squat"));

        let mut phases = Vec::new();
        let mut all_events = Vec::new();
        let knees = [175.0; 30].into_iter().chain([95.0; 30]).chain([175.0; 30]);
        for (i, knee) in knees.enumerate() {
            let outcome = s.feed(Some(squat(knee, knee)), i as u64 * FRAME_MS).unwrap();
            phases.push(outcome.result.phase.clone());
            all_events.extend(outcome.events);
        }

        // The first bottom frame is pulled back toward standing
        assert_ne!(phases[30], "BOTTOM");
        assert_eq!(phases[59], "BOTTOM");
        assert_eq!(phases[89], "STANDING");
        assert_eq!(reps_in(&all_events), vec![1]);
        assert!(s.smoother.is_primed());
    }

    #[test]
    fn test_finish_clears_smoothing_state() {
        let mut s = smoothed_session();
        s.start(exercise("squat"));
        for i in 0..10 {
            s.feed(Some(squat(175.0, 175.0)), i * FRAME_MS);
        }
        s.finish();
        assert!(!s.smoother.is_primed());

        // No lag carried over from the standing frames
        s.start(exercise("squat"));
        let outcome = s.feed(Some(squat(95.0, 95.0)), 10 * FRAME_MS).unwrap();
        assert_eq!(outcome.result.phase, "BOTTOM");
    }

    #[test]
    fn test_restart_clears_smoothing_state() {
        let mut s = smoothed_session();
        s.start(exercise("squat"));
        for i in 0..10 {
            s.feed(Some(squat(175.0, 175.0)), i * FRAME_MS);
        }
        s.start(exercise("squat"));
        assert!(!s.smoother.is_primed());
        let outcome = s.feed(Some(squat(95.0, 95.0)), 10 * FRAME_MS).unwrap();
        assert_eq!(outcome.result.phase, "BOTTOM");
    }

    #[test]
    fn test_hold_has_no_motion_flag() {
        let mut s = session();
        s.start(exercise("plank"));
        let outcome = s.feed(Some(plank(0.0)), 0).unwrap();
        assert_eq!(outcome.result.phase, "HOLD");
        assert_eq!(outcome.result.is_moving, None);
    }

    #[test]
    fn test_feed_without_session() {
        let mut s = session();
        assert!(s.feed(Some(squat(175.0, 175.0)), 0).is_none());
    }

    #[test]
    fn test_finish_announces_and_is_idempotent() {
        let mut s = session();
        s.start(exercise("squat"));
        let events = s.finish();
        assert_eq!(events, vec![
            SessionEvent::SpeakRequested {
                message: "Great workout! You did 0 reps of Squat.".into(),
                forced: true,
            },
            SessionEvent::SessionEnded { exercise_id: "squat".into(), reps: 0 },
        ]);
        assert!(!s.is_active());
        assert!(s.finish().is_empty());
        assert!(s.abort().is_empty());
    }

    #[test]
    fn test_abort_cancels_speech_silently() {
        let mut s = session();
        s.start(exercise("squat"));
        let spoken_before = s.throttler().sink().spoken.len();
        let events = s.abort();
        assert_eq!(events, vec![SessionEvent::SessionEnded { exercise_id: "squat".into(), reps: 0 }]);
        assert_eq!(s.throttler().sink().cancels, 1);
        assert_eq!(s.throttler().sink().spoken.len(), spoken_before);
        assert!(!s.throttler().channel().is_busy());
    }

    #[test]
    fn test_restart_resets_reps() {
        let mut s = session();
        s.start(exercise("squat"));
        for (i, knee) in [175.0, 175.0, 95.0, 95.0, 175.0, 175.0].into_iter().enumerate() {
            s.feed(Some(squat(knee, knee)), i as u64 * FRAME_MS);
        }
        assert_eq!(s.reps(), 1);
        s.start(exercise("push_up"));
        assert_eq!(s.reps(), 0);
        assert_eq!(s.exercise().map(|e| e.id.as_str()), Some("push_up"));
    }
}
