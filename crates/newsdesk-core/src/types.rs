//! Shared types used across the newsdesk services.
//!
//! This module defines the content item enums and identifiers that give the
//! storage and broadcast layers a typed view of otherwise free-form documents.

use crate::error::NewsdeskError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for content item identifiers taken from request paths.
///
/// Item ids are word characters plus `,`, `.`, `:` and `-`, which covers both
/// UUIDs and the `urn:` style guids produced by ingest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new `ItemId` from a string.
    ///
    /// # Errors
    /// Returns error if the id is empty or contains characters outside the item url pattern.
    pub fn new(id: impl Into<String>) -> Result<Self, NewsdeskError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a new random `ItemId` using UUID v4 formatting.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(id: &str) -> Result<(), NewsdeskError> {
        static ITEM_ID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            ITEM_ID_REGEX.get_or_init(|| Regex::new(r"^[\w,.:-]+$").expect("valid regex"));

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(NewsdeskError::Validation(format!(
                "invalid item ID: expected word characters, ',', '.', ':' or '-', got '{id}'"
            )))
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Content type of an item.
///
/// Types this service does not model keep their original name in `Other`, so
/// they are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    /// Plain text story
    Text,
    /// Pre-formatted (fixed width) story
    Preformatted,
    /// Still image
    Picture,
    /// Audio clip
    Audio,
    /// Video clip
    Video,
    /// Graphic
    Graphic,
    /// Package of other items
    Composite,
    /// Any other type, by its stored name
    Other(String),
}

impl ItemType {
    /// Whether a broadcast item may be derived from an item of this type.
    #[must_use]
    pub fn is_broadcastable(&self) -> bool {
        matches!(self, Self::Text | Self::Preformatted)
    }

    /// The stored name of the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Preformatted => "preformatted",
            Self::Picture => "picture",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Graphic => "graphic",
            Self::Composite => "composite",
            Self::Other(name) => name,
        }
    }
}

/// An item without a type.
impl Default for ItemType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ItemType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => Self::Text,
            "preformatted" => Self::Preformatted,
            "picture" => Self::Picture,
            "audio" => Self::Audio,
            "video" => Self::Video,
            "graphic" => Self::Graphic,
            "composite" => Self::Composite,
            _ => Self::Other(name),
        }
    }
}

impl From<ItemType> for String {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of an item.
///
/// Unmodelled states are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemState {
    /// Created but never submitted
    #[default]
    Draft,
    /// Received from an ingest provider
    Ingested,
    /// Routed to a desk by ingest rules
    Routed,
    /// Fetched from ingest into a desk
    Fetched,
    /// Submitted to a desk stage
    Submitted,
    /// Being worked on
    InProgress,
    /// Published
    Published,
    /// Corrected after publication
    Corrected,
    /// Killed after publication
    Killed,
    /// Scheduled for later publication
    Scheduled,
    /// Spiked (soft deleted)
    Spiked,
    /// Any other state, by its stored name
    Other(String),
}

impl ItemState {
    /// Whether an item in this state must not spawn a broadcast item.
    #[must_use]
    pub fn blocks_broadcast(&self) -> bool {
        matches!(self, Self::Killed | Self::Scheduled | Self::Spiked)
    }

    /// The stored name of the state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Ingested => "ingested",
            Self::Routed => "routed",
            Self::Fetched => "fetched",
            Self::Submitted => "submitted",
            Self::InProgress => "in_progress",
            Self::Published => "published",
            Self::Corrected => "corrected",
            Self::Killed => "killed",
            Self::Scheduled => "scheduled",
            Self::Spiked => "spiked",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ItemState {
    fn from(name: String) -> Self {
        match name.as_str() {
            "draft" => Self::Draft,
            "ingested" => Self::Ingested,
            "routed" => Self::Routed,
            "fetched" => Self::Fetched,
            "submitted" => Self::Submitted,
            "in_progress" => Self::InProgress,
            "published" => Self::Published,
            "corrected" => Self::Corrected,
            "killed" => Self::Killed,
            "scheduled" => Self::Scheduled,
            "spiked" => Self::Spiked,
            _ => Self::Other(name),
        }
    }
}

impl From<ItemState> for String {
    fn from(state: ItemState) -> Self {
        match state {
            ItemState::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
