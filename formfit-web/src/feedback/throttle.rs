//! Feedback throttler - verdict stream in, rate-limited speech out
//!
//! Owns the sink and the speech channel; nothing else may issue an
//! utterance. Coaching messages wait out the cooldown and any utterance in
//! flight. Forced announcements (reps, session start/end) preempt both.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use super::phrases::{self, AFFIRMATIONS, GET_IN_POSITION, START_MOVING};
use super::sink::{SpeechChannel, SpeechSink};
use crate::config::FeedbackConfig;
use crate::evaluator::EvaluationResult;

/// A message that was handed to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakRequest {
    pub message: String,
    pub forced: bool,
}

pub struct FeedbackThrottler<S: SpeechSink> {
    sink: S,
    channel: SpeechChannel,
    config: FeedbackConfig,
    enabled: bool,
    last_announced_rep: u32,
    rng: SmallRng,
}

impl<S: SpeechSink> FeedbackThrottler<S> {
    pub fn new(sink: S, config: FeedbackConfig, seed: u64) -> Self {
        Self {
            sink,
            channel: SpeechChannel::new(),
            config,
            enabled: true,
            last_announced_rep: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn channel(&self) -> &SpeechChannel {
        &self.channel
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Muting also silences the current utterance
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    pub fn last_announced_rep(&self) -> u32 {
        self.last_announced_rep
    }

    /// Choose what a coach would say about this verdict
    ///
    /// Priority: not moving, not in position, first error, affirmation.
    /// `None` flags are treated as satisfied.
    pub fn select_message(&mut self, result: &EvaluationResult) -> String {
        if result.is_moving == Some(false) {
            return START_MOVING.to_string();
        }
        if result.is_in_position == Some(false) {
            return GET_IN_POSITION.to_string();
        }
        if let Some(error) = result.errors.first() {
            return phrases::coaching_phrase(error);
        }
        let pick = self.rng.gen_range(0..AFFIRMATIONS.len());
        AFFIRMATIONS[pick].to_string()
    }

    fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        self.channel
            .last_spoken_at()
            .map_or(true, |at| now_ms.saturating_sub(at) >= self.config.min_gap_ms)
    }

    /// Coaching for one frame, if the cooldown allows
    pub fn on_evaluation(&mut self, result: &EvaluationResult, now_ms: u64) -> Option<SpeakRequest> {
        if self.channel.expire_stale(now_ms, self.config.max_utterance_ms) {
            warn!(
                max_utterance_ms = self.config.max_utterance_ms,
                "utterance end never reported; channel released"
            );
        }
        if !self.enabled || self.channel.is_busy() || !self.cooldown_elapsed(now_ms) {
            return None;
        }
        let message = self.select_message(result);
        self.say(message, false)
    }

    /// Forced milestone for a newly completed rep
    pub fn announce_rep(&mut self, reps: u32) -> Option<SpeakRequest> {
        if reps <= self.last_announced_rep {
            return None;
        }
        self.last_announced_rep = reps;
        self.say(phrases::rep_message(reps), true)
    }

    pub fn announce_start(&mut self, exercise_name: &str) -> Option<SpeakRequest> {
        self.say(phrases::start_message(exercise_name), true)
    }

    pub fn announce_end(&mut self, exercise_name: &str, reps: u32) -> Option<SpeakRequest> {
        self.say(phrases::end_message(exercise_name, reps), true)
    }

    fn say(&mut self, message: String, forced: bool) -> Option<SpeakRequest> {
        if !self.enabled || message.is_empty() {
            return None;
        }
        match self.channel.speak(&mut self.sink, &message) {
            Ok(_) => {
                debug!(%message, forced, "speak requested");
                Some(SpeakRequest { message, forced })
            }
            Err(err) => {
                warn!(%err, %message, "speech sink rejected utterance");
                None
            }
        }
    }

    pub fn on_utterance_start(&mut self, id: u64) {
        self.channel.on_start(id);
    }

    pub fn on_utterance_end(&mut self, id: u64, now_ms: u64) {
        if !self.channel.on_end(id, now_ms) {
            debug!(id, "ignoring end of superseded utterance");
        }
    }

    /// Stop speaking immediately
    pub fn cancel(&mut self) {
        if let Err(err) = self.channel.cancel(&mut self.sink) {
            warn!(%err, "speech cancel failed");
        }
    }

    /// Silence and forget cooldown and milestone state
    pub fn reset(&mut self) {
        self.cancel();
        self.channel.reset();
        self.last_announced_rep = 0;
    }
}
