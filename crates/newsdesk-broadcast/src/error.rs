//! Error types for broadcast operations.

use newsdesk_db::DatabaseError;
use thiserror::Error;

/// Error types for broadcast creation.
///
/// The first four variants are caller mistakes and carry the message shown
/// to the user. Store failures are wrapped as-is.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The master item does not exist.
    #[error("Cannot find the requested item id.")]
    NotFound,

    /// The master item is not text or preformatted, or is itself a broadcast item.
    #[error("Invalid content type.")]
    InvalidType,

    /// The master item is killed, scheduled or spiked.
    #[error("Invalid content state.")]
    InvalidState,

    /// The broadcast genre is missing from the genre vocabulary.
    #[error("Cannot find the {genre} genre.")]
    Config {
        /// Configured broadcast genre value
        genre: String,
    },

    /// Content store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BroadcastError {
    /// Whether the error was caused by the request rather than the system.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::InvalidType | Self::InvalidState | Self::Config { .. }
        )
    }
}

/// Result type alias for broadcast operations.
pub type Result<T> = std::result::Result<T, BroadcastError>;
