//! Speech sink contract and the one-utterance-at-a-time channel
//!
//! ```text
//!          speak              on_start             on_end
//! Idle ───────────▶ Pending ───────────▶ Speaking ─────────▶ Idle
//!   ▲                  │ speak/cancel        │ speak/cancel
//!   └──────────────────┴─────────────────────┘
//! ```
//!
//! Every utterance carries an id so late callbacks from a cancelled
//! utterance cannot close the one that replaced it.

use tracing::{debug, warn};

use crate::error::SinkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
}

/// Anything that can voice text: browser speech synthesis, a test recorder
pub trait SpeechSink {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SinkError>;

    /// Stop whatever is being spoken; a no-op when silent
    fn cancel(&mut self) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    /// Handed to the sink, start not yet reported
    Pending(u64),
    Speaking(u64),
}

#[derive(Debug, Clone)]
pub struct SpeechChannel {
    state: ChannelState,
    next_id: u64,
    /// Set when an utterance finishes, not when it is issued
    last_spoken_at: Option<u64>,
    /// First time the current utterance was seen busy by `expire_stale`
    busy_since: Option<u64>,
}

impl SpeechChannel {
    pub fn new() -> Self {
        Self {
            state: ChannelState::Idle,
            next_id: 1,
            last_spoken_at: None,
            busy_since: None,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// An utterance is pending or playing
    pub fn is_busy(&self) -> bool {
        self.state != ChannelState::Idle
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, ChannelState::Speaking(_))
    }

    pub fn last_spoken_at(&self) -> Option<u64> {
        self.last_spoken_at
    }

    /// Cancel anything in flight, then hand `text` to the sink
    pub fn speak<S: SpeechSink>(&mut self, sink: &mut S, text: &str) -> Result<u64, SinkError> {
        if self.is_busy() {
            if let Err(err) = sink.cancel() {
                warn!(%err, "cancel before speak failed");
            }
            self.state = ChannelState::Idle;
        }

        let utterance = Utterance {
            id: self.next_id,
            text: text.to_string(),
        };
        self.next_id += 1;
        self.busy_since = None;
        sink.speak(&utterance)?;
        debug!(id = utterance.id, text, "utterance issued");
        self.state = ChannelState::Pending(utterance.id);
        Ok(utterance.id)
    }

    pub fn on_start(&mut self, id: u64) -> bool {
        match self.state {
            ChannelState::Pending(current) | ChannelState::Speaking(current) if current == id => {
                self.state = ChannelState::Speaking(id);
                true
            }
            _ => false,
        }
    }

    /// Returns false for callbacks from a superseded utterance
    pub fn on_end(&mut self, id: u64, now_ms: u64) -> bool {
        match self.state {
            ChannelState::Pending(current) | ChannelState::Speaking(current) if current == id => {
                self.state = ChannelState::Idle;
                self.busy_since = None;
                self.last_spoken_at = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Close an utterance whose end callback never arrived
    ///
    /// The clock starts at the first call that finds the channel busy. Once
    /// `max_ms` has passed the utterance is treated as finished at `now_ms`,
    /// so the cooldown still applies. Returns true when it expired.
    pub fn expire_stale(&mut self, now_ms: u64, max_ms: u64) -> bool {
        if !self.is_busy() {
            return false;
        }
        let since = *self.busy_since.get_or_insert(now_ms);
        if now_ms.saturating_sub(since) < max_ms {
            return false;
        }
        self.state = ChannelState::Idle;
        self.busy_since = None;
        self.last_spoken_at = Some(now_ms);
        true
    }

    pub fn cancel<S: SpeechSink>(&mut self, sink: &mut S) -> Result<(), SinkError> {
        if !self.is_busy() {
            return Ok(());
        }
        self.state = ChannelState::Idle;
        self.busy_since = None;
        sink.cancel()
    }

    /// Forget cooldown history; ids keep counting
    pub fn reset(&mut self) {
        self.state = ChannelState::Idle;
        self.last_spoken_at = None;
        self.busy_since = None;
    }
}

impl Default for SpeechChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Records everything it is asked to do
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
    pub fail: bool,
}

#[cfg(test)]
impl RecordingSink {
    pub fn texts(&self) -> Vec<&str> {
        self.spoken.iter().map(|u| u.text.as_str()).collect()
    }

    pub fn last_id(&self) -> Option<u64> {
        self.spoken.last().map(|u| u.id)
    }
}

#[cfg(test)]
impl SpeechSink for RecordingSink {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Unavailable);
        }
        self.spoken.push(utterance.clone());
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SinkError> {
        self.cancels += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut sink = RecordingSink::default();
        let mut channel = SpeechChannel::new();
        let id = channel.speak(&mut sink, "hello").unwrap();
        assert_eq!(channel.state(), ChannelState::Pending(id));
        assert!(channel.on_start(id));
        assert!(channel.is_speaking());
        assert!(channel.on_end(id, 900));
        assert_eq!(channel.state(), ChannelState::Idle);
        assert_eq!(channel.last_spoken_at(), Some(900));
    }

    #[test]
    fn test_speak_over_busy_channel_cancels_first() {
        let mut sink = RecordingSink::default();
        let mut channel = SpeechChannel::new();
        let first = channel.speak(&mut sink, "one").unwrap();
        let second = channel.speak(&mut sink, "two").unwrap();
        assert_eq!(sink.cancels, 1);
        assert_ne!(first, second);
        // Late end from the cancelled utterance is ignored
        assert!(!channel.on_end(first, 100));
        assert_eq!(channel.state(), ChannelState::Pending(second));
        assert_eq!(channel.last_spoken_at(), None);
    }

    #[test]
    fn test_failed_speak_leaves_channel_idle() {
        let mut sink = RecordingSink { fail: true, ..Default::default() };
        let mut channel = SpeechChannel::new();
        assert_eq!(channel.speak(&mut sink, "hello"), Err(SinkError::Unavailable));
        assert!(!channel.is_busy());
    }

    #[test]
    fn test_lost_end_callback_expires() {
        let mut sink = RecordingSink::default();
        let mut channel = SpeechChannel::new();
        let id = channel.speak(&mut sink, "hello").unwrap();
        channel.on_start(id);

        assert!(!channel.expire_stale(1_000, 10_000));
        assert!(!channel.expire_stale(10_999, 10_000));
        assert!(channel.is_speaking());

        assert!(channel.expire_stale(11_000, 10_000));
        assert_eq!(channel.state(), ChannelState::Idle);
        assert_eq!(channel.last_spoken_at(), Some(11_000));
        // The real end arriving later is stale
        assert!(!channel.on_end(id, 12_000));
        assert_eq!(channel.last_spoken_at(), Some(11_000));
    }

    #[test]
    fn test_watchdog_clock_restarts_per_utterance() {
        let mut sink = RecordingSink::default();
        let mut channel = SpeechChannel::new();
        let first = channel.speak(&mut sink, "one").unwrap();
        assert!(!channel.expire_stale(0, 10_000));
        channel.on_end(first, 2_000);
        assert!(!channel.expire_stale(5_000, 10_000));

        channel.speak(&mut sink, "two").unwrap();
        assert!(!channel.expire_stale(12_000, 10_000));
        assert!(channel.is_busy());
        assert!(channel.expire_stale(22_000, 10_000));
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut sink = RecordingSink::default();
        let mut channel = SpeechChannel::new();
        channel.cancel(&mut sink).unwrap();
        assert_eq!(sink.cancels, 0);
    }
}
