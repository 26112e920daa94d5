//! Session store and JS entry points
//!
//! One coaching session per page. JS pushes landmark frames in and drains
//! events out as JSON.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::speech::WebSpeechSink;
use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::events::SessionEvent;
use crate::exercise::Catalog;
use crate::pose::Frame;
use crate::session::CoachSession;

/// MediaPipe pose layout: x, y, z per landmark
pub const LANDMARK_STRIDE: usize = 3;

struct BridgeState {
    catalog: Catalog,
    session: Option<CoachSession<WebSpeechSink>>,
    /// Drained by `take_events`
    events: Vec<SessionEvent>,
    voice_enabled: bool,
    generation: u64,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self {
            catalog: Catalog::builtin(),
            session: None,
            events: Vec::new(),
            voice_enabled: true,
            generation: 0,
        }
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static STATE: RefCell<BridgeState> = RefCell::new(BridgeState::default());
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start coaching `exercise_id`, replacing any running session
///
/// `config_json` overrides engine tunables; missing fields keep defaults.
#[wasm_bindgen]
pub fn start_session(exercise_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json(&json).map_err(to_js)?,
        None => EngineConfig::default(),
    };

    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        let exercise = state
            .catalog
            .find(exercise_id)
            .cloned()
            .ok_or_else(|| to_js(CatalogError::UnknownExercise(exercise_id.to_string())))?;

        if let Some(mut old) = state.session.take() {
            let ended = old.abort();
            state.events.extend(ended);
        }

        state.generation += 1;
        let mut session = CoachSession::new(WebSpeechSink::new(state.generation), config, now_ms());
        session.set_voice_enabled(state.voice_enabled);
        let started = session.start(exercise);
        state.events.extend(started);
        state.session = Some(session);

        web_sys::console::log_1(&format!("✅ Session started: {exercise_id}").into());
        Ok(())
    })
}

/// Feed one frame of flat landmark data; an empty array means nobody detected
///
/// Returns the evaluation as JSON, or `None` when no session is running.
#[wasm_bindgen]
pub fn feed_landmarks(data: &[f32]) -> Option<String> {
    let frame = if data.is_empty() {
        None
    } else {
        let frame = Frame::from_flat(data, LANDMARK_STRIDE);
        if frame.is_none() {
            web_sys::console::warn_1(
                &format!("Invalid landmark data length: {} (stride {LANDMARK_STRIDE})", data.len())
                    .into(),
            );
        }
        frame
    };

    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        let outcome = state.session.as_mut()?.feed(frame, now_ms())?;
        for event in &outcome.events {
            if let SessionEvent::RepCounted { reps } = event {
                web_sys::console::log_1(&format!("🏋️ Rep {reps}").into());
            }
        }
        state.events.extend(outcome.events);
        serde_json::to_string(&outcome.result).ok()
    })
}

/// Announce the final count and end the session
#[wasm_bindgen]
pub fn finish_session() {
    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        let ended = state.session.as_mut().map(|s| s.finish()).unwrap_or_default();
        state.events.extend(ended);
    });
}

/// End the session immediately, cutting off any speech
#[wasm_bindgen]
pub fn abort_session() {
    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        let ended = state.session.as_mut().map(|s| s.abort()).unwrap_or_default();
        state.events.extend(ended);
    });
}

#[wasm_bindgen]
pub fn set_voice_enabled(enabled: bool) {
    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        state.voice_enabled = enabled;
        if let Some(session) = state.session.as_mut() {
            session.set_voice_enabled(enabled);
        }
    });
}

/// Drain pending session events as a JSON array
#[wasm_bindgen]
pub fn take_events() -> String {
    STATE.with(|cell| {
        let events = std::mem::take(&mut cell.borrow_mut().events);
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    })
}

#[wasm_bindgen]
pub fn current_reps() -> u32 {
    STATE.with(|cell| cell.borrow().session.as_ref().map_or(0, |s| s.reps()))
}

#[wasm_bindgen]
pub fn current_phase() -> String {
    STATE.with(|cell| {
        cell.borrow()
            .session
            .as_ref()
            .map_or_else(|| crate::exercise::READY.to_string(), |s| s.current_phase().to_string())
    })
}

/// Catalog as JSON, optionally filtered by category ("All" for everything)
#[wasm_bindgen]
pub fn list_exercises(category: Option<String>) -> String {
    STATE.with(|cell| {
        let state = cell.borrow();
        let exercises = state.catalog.by_category(category.as_deref().unwrap_or("All"));
        serde_json::to_string(&exercises).unwrap_or_else(|_| "[]".to_string())
    })
}

/// Exercise id named in free text such as a voice command
#[wasm_bindgen]
pub fn match_exercise(text: &str) -> Option<String> {
    STATE.with(|cell| cell.borrow().catalog.match_spoken(text).map(|e| e.id.clone()))
}

/// Replace the catalog with JSON definitions; returns how many were accepted
///
/// Malformed entries are skipped and logged.
#[wasm_bindgen]
pub fn load_exercises(json: &str) -> Result<u32, JsValue> {
    let catalog = Catalog::from_json(json).map_err(to_js)?;
    for err in catalog.rejected() {
        web_sys::console::warn_1(&format!("Skipped exercise: {err}").into());
    }
    let accepted = catalog.exercises().len() as u32;
    STATE.with(|cell| cell.borrow_mut().catalog = catalog);
    Ok(accepted)
}

// ============================================================================
// SPEECH CALLBACKS (no wasm_bindgen)
// ============================================================================

fn with_session(generation: u64, f: impl FnOnce(&mut CoachSession<WebSpeechSink>)) {
    STATE.with(|cell| {
        let Ok(mut state) = cell.try_borrow_mut() else {
            web_sys::console::warn_1(&"Speech callback during session update, dropped".into());
            return;
        };
        if state.generation != generation {
            return;
        }
        if let Some(session) = state.session.as_mut() {
            f(session);
        }
    });
}

pub(crate) fn utterance_started(generation: u64, id: u64) {
    with_session(generation, |session| session.on_utterance_start(id));
}

pub(crate) fn utterance_ended(generation: u64, id: u64) {
    let now = now_ms();
    with_session(generation, |session| session.on_utterance_end(id, now));
}
