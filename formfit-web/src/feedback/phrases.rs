//! Spoken phrase tables
//!
//! Evaluator error strings are terse labels; these are the sentences a
//! coach would actually say.

use crate::evaluator::{
    ARMS_UNEVEN, CANT_SEE_ERROR, CURL_UNEVEN, ELBOW_DRIFT, FRONT_KNEE, HIPS_PIKE, HIPS_SAG,
    KNEES_PAST_TOES, PUSH_UNEVEN, RAISE_TOO_HIGH, RAISE_UNEVEN, STACK_WRISTS, WEIGHT_UNEVEN,
};

pub const START_MOVING: &str = "Start moving! Begin the exercise.";
pub const GET_IN_POSITION: &str = "Get into position first.";
pub const STEP_INTO_FRAME: &str = "I can't see you. Step back so your whole body is in frame.";

/// Picked uniformly when form is clean
pub const AFFIRMATIONS: [&str; 5] = [
    "Perfect form!",
    "Great job!",
    "Excellent technique!",
    "You're crushing it!",
    "Keep it up!",
];

/// Substring of an error → coaching phrase, first match wins
const COACHING_PHRASES: &[(&str, &str)] = &[
    (CANT_SEE_ERROR, STEP_INTO_FRAME),
    (ARMS_UNEVEN, "Keep your arms moving together!"),
    (STACK_WRISTS, "Stack your wrists under your elbows!"),
    (WEIGHT_UNEVEN, "Keep your weight even on both legs!"),
    (KNEES_PAST_TOES, "Don't let your knees go past your toes!"),
    ("Go lower", "Go lower for full range of motion!"),
    (ELBOW_DRIFT, "Keep your elbows pinned to your sides!"),
    (CURL_UNEVEN, "Curl both arms evenly!"),
    (HIPS_SAG, "Don't let your hips sag. Engage your core!"),
    (HIPS_PIKE, "Don't pike up. Keep your body straight!"),
    (PUSH_UNEVEN, "Push evenly with both arms!"),
    (FRONT_KNEE, "Keep your front knee over your ankle!"),
    (RAISE_UNEVEN, "Raise both arms evenly!"),
    (RAISE_TOO_HIGH, "Don't raise your arms above shoulder height!"),
];

/// Coaching phrase for an error; unmapped errors are spoken verbatim
pub fn coaching_phrase(error: &str) -> String {
    COACHING_PHRASES
        .iter()
        .find(|(needle, _)| error.contains(needle))
        .map(|(_, phrase)| phrase.to_string())
        .unwrap_or_else(|| error.to_string())
}

pub fn rep_message(reps: u32) -> String {
    match reps {
        1 => "One!".to_string(),
        5 => "Five! Great job!".to_string(),
        10 => "Ten! You're on fire!".to_string(),
        n if n % 5 == 0 => format!("{n}!"),
        n => n.to_string(),
    }
}

pub fn start_message(exercise_name: &str) -> String {
    format!("Starting {exercise_name}. Get into position and begin when ready!")
}

pub fn end_message(exercise_name: &str, reps: u32) -> String {
    format!("Great workout! You did {reps} reps of {exercise_name}.")
}
