//! Feedback module - coaching phrases, speech sink, throttling
//!
//! Re-exports only. All logic in submodules.

mod phrases;
mod sink;
mod throttle;

#[cfg(test)]
pub(crate) use sink::RecordingSink;

pub use phrases::{
    coaching_phrase, end_message, rep_message, start_message,
    AFFIRMATIONS, GET_IN_POSITION, START_MOVING, STEP_INTO_FRAME,
};
pub use sink::{ChannelState, SpeechChannel, SpeechSink, Utterance};
pub use throttle::{FeedbackThrottler, SpeakRequest};
