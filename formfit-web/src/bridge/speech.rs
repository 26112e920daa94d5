//! Web Speech API sink
//!
//! Utterance callbacks fire later from the browser event loop and are
//! routed back into the session store by (generation, id).

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

use super::session::{utterance_ended, utterance_started};
use crate::error::SinkError;
use crate::feedback::{SpeechSink, Utterance};

/// Slightly brisk, matches a coach counting reps
const SPEECH_RATE: f32 = 1.1;

pub struct WebSpeechSink {
    synth: Option<SpeechSynthesis>,
    /// Bumped per session so stale callbacks are dropped
    generation: u64,
}

impl WebSpeechSink {
    pub fn new(generation: u64) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            web_sys::console::warn_1(&"⚠️ speechSynthesis unavailable, coaching is muted".into());
        }
        Self { synth, generation }
    }

    fn synth(&self) -> Result<&SpeechSynthesis, SinkError> {
        self.synth.as_ref().ok_or(SinkError::Unavailable)
    }
}

impl SpeechSink for WebSpeechSink {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SinkError> {
        let synth = self.synth()?;
        let spoken = SpeechSynthesisUtterance::new_with_text(&utterance.text)
            .map_err(|err| SinkError::Failed(format!("{err:?}")))?;
        spoken.set_rate(SPEECH_RATE);

        let (generation, id) = (self.generation, utterance.id);
        let on_start = Closure::once_into_js(move || utterance_started(generation, id));
        let on_end = Closure::once_into_js(move || utterance_ended(generation, id));
        // Some browsers report an interrupted utterance only through onerror
        let on_error = Closure::once_into_js(move || utterance_ended(generation, id));
        spoken.set_onstart(Some(on_start.unchecked_ref()));
        spoken.set_onend(Some(on_end.unchecked_ref()));
        spoken.set_onerror(Some(on_error.unchecked_ref()));

        synth.speak(&spoken);
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), SinkError> {
        self.synth()?.cancel();
        Ok(())
    }
}
