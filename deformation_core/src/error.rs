//! Errors surfaced by the deformation engine.

use thiserror::Error;

/// Every failure the engine can report. Nothing is retried or defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeformationError {
    /// The prompt was empty after trimming whitespace.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("{field} must be an integer between {min} and {max}, got {received}")]
    InvalidIntensity {
        field: &'static str,
        received: i64,
        min: u8,
        max: u8,
    },

    #[error("unknown character '{name}' (available: {})", .available.join(", "))]
    UnknownCharacter { name: String, available: Vec<String> },

    /// A loaded profile lacks data the requested call needs.
    #[error("profile for '{character}' is incomplete: {detail}")]
    ProfileIncomplete { character: String, detail: String },
}

impl DeformationError {
    pub(crate) fn profile_incomplete(character: &str, detail: impl Into<String>) -> Self {
        DeformationError::ProfileIncomplete {
            character: character.to_string(),
            detail: detail.into(),
        }
    }
}
