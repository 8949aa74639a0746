//! Error types for the conversational core.

use hearth_core::error::HearthError;

/// Errors from the conversational core.
///
/// Transport failures during a search turn never surface here; the
/// orchestrator recovers from those locally. What remains are
/// programming-contract violations and state-handling failures.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid conversational role: {0}")]
    InvalidRole(String),
    #[error("state error: {0}")]
    State(String),
}

impl From<HearthError> for ChatError {
    fn from(err: HearthError) -> Self {
        match err {
            HearthError::InvalidRole(role) => ChatError::InvalidRole(role),
            other => ChatError::State(other.to_string()),
        }
    }
}
