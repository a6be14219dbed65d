//! Error types for commands.

use newsdesk_broadcast::BroadcastError;
use newsdesk_core::{ConfigError, NewsdeskError};
use newsdesk_db::DatabaseError;
use serde::Serialize;

/// Serializable error returned by command handlers.
#[derive(Debug, Serialize)]
pub struct CommandError {
    /// Error code for client handling (e.g., "INVALID_CONTENT_TYPE")
    pub code: String,
    /// HTTP status equivalent
    pub status: u16,
    /// User-facing message
    pub message: String,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        status: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            status,
            message: message.into(),
            details: Some(details),
        }
    }

    /// A 400 for a malformed request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("INVALID_REQUEST", 400, message)
    }
}

impl From<BroadcastError> for CommandError {
    fn from(err: BroadcastError) -> Self {
        let message = err.to_string();
        match err {
            BroadcastError::NotFound => Self::new("NOT_FOUND", 404, message),
            BroadcastError::InvalidType => Self::new("INVALID_CONTENT_TYPE", 400, message),
            BroadcastError::InvalidState => Self::new("INVALID_CONTENT_STATE", 400, message),
            BroadcastError::Config { genre } => Self::with_details(
                "GENRE_NOT_CONFIGURED",
                400,
                message,
                serde_json::json!({ "genre": genre }),
            ),
            BroadcastError::Serialization(_) => Self::invalid_request(message),
            BroadcastError::Database(err) => err.into(),
        }
    }
}

impl From<DatabaseError> for CommandError {
    fn from(err: DatabaseError) -> Self {
        tracing::error!("Database error: {}", err);
        Self::new("DATABASE_ERROR", 500, format!("Database error: {err}"))
    }
}

impl From<NewsdeskError> for CommandError {
    fn from(err: NewsdeskError) -> Self {
        match err {
            NewsdeskError::Validation(msg) => Self::invalid_request(msg),
            other => Self::new("INTERNAL_ERROR", 500, other.to_string()),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", 500, format!("Configuration error: {err}"))
    }
}
