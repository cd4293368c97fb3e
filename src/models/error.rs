//! Errors surfaced by the progress operations.

use crate::models::player::ExternalId;
use crate::storage::StoreError;

/// Errors that can occur during player/progress operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgressError {
    /// No player is linked to this external id.
    PlayerNotFound(ExternalId),
    /// Request input was out of bounds or malformed.
    Validation(String),
    /// The player store failed; nothing was committed.
    Storage(StoreError),
}

impl std::fmt::Display for ProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressError::PlayerNotFound(_) => write!(f, "Player not found"),
            ProgressError::Validation(msg) => write!(f, "{}", msg),
            ProgressError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for ProgressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgressError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ProgressError {
    fn from(e: StoreError) -> Self {
        ProgressError::Storage(e)
    }
}
