//! Error types
//!
//! None of these ever abort the frame loop. Catalog and config errors are
//! raised at load time; sink errors are logged and swallowed by the
//! feedback throttler.

use thiserror::Error;

/// Malformed exercise definition or catalog document
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("exercise '{id}' declares no phases")]
    NoPhases { id: String },

    #[error("exercise '{id}' phase '{phase}' has no angle ranges")]
    EmptyPhase { id: String, phase: String },

    #[error("exercise '{id}' phase '{phase}': range for {angle} is invalid ({min}..{max})")]
    InvalidRange {
        id: String,
        phase: String,
        angle: String,
        min: f32,
        max: f32,
    },

    #[error("exercise '{id}' phase order {order:?} must name two distinct declared phases")]
    InvalidPhaseOrder { id: String, order: Vec<String> },

    #[error("exercise '{id}' uses reserved phase name '{phase}'")]
    ReservedPhase { id: String, phase: String },

    #[error("exercise '{id}' declares phase '{phase}' twice")]
    DuplicatePhase { id: String, phase: String },

    #[error("duplicate exercise id '{0}'")]
    DuplicateId(String),

    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    #[error("catalog JSON is invalid: {0}")]
    Parse(String),
}

/// Invalid engine tunables
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be {requirement}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
    },

    #[error("config JSON is invalid: {0}")]
    Parse(String),
}

/// The speech sink could not start or cancel an utterance
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    #[error("speech synthesis is unavailable")]
    Unavailable,

    #[error("speech sink failed: {0}")]
    Failed(String),
}
