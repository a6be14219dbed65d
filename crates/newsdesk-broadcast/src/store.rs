//! Collaborator traits the broadcast core runs against.
//!
//! The core never talks to a database directly. It needs a content store
//! (find, query, insert, conditional system update, version recording), the
//! genre vocabulary and desk lookup. [`crate::SqliteStore`] implements all
//! three over `newsdesk-db`.

use async_trait::async_trait;
use newsdesk_db::{BroadcastRows, ContentItem, Desk, Result, Vocabulary};
use serde_json::{Map, Value};

/// Broadcast item lookups supported by the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastQuery {
    /// Broadcast items whose `master_id` or `takes_package_id` is one of `ids`.
    ForMaster {
        /// Candidate master and takes package ids
        ids: Vec<String>,
    },
    /// Broadcast items whose `rewrite_id` equals `rewrite_id`.
    ByRewrite {
        /// Rewrite item id
        rewrite_id: String,
    },
}

/// Content item storage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Get an item by id.
    async fn find_one(&self, id: &str) -> Result<Option<ContentItem>>;

    /// Get broadcast items tagged with `genre_value` that match `query`.
    ///
    /// Every call runs a fresh query. Items whose stored document cannot be
    /// read come back in `undecodable` rather than failing the lookup.
    async fn find_broadcasts(
        &self,
        genre_value: &str,
        query: &BroadcastQuery,
    ) -> Result<BroadcastRows>;

    /// Persist a new item, assigning its id and initial version.
    async fn insert(&self, item: ContentItem) -> Result<ContentItem>;

    /// Apply top-level field updates without user-facing validation.
    ///
    /// Rejected with `DatabaseError::VersionConflict` when the stored item
    /// moved past `base`.
    async fn system_update(
        &self,
        id: &str,
        updates: &Map<String, Value>,
        base: &ContentItem,
    ) -> Result<ContentItem>;

    /// Record the item in the version history.
    async fn record_version(&self, item: &ContentItem) -> Result<()>;
}

/// Controlled vocabulary lookup.
#[async_trait]
pub trait VocabularyLookup: Send + Sync {
    /// Get a vocabulary by id.
    async fn get_vocabulary(&self, id: &str) -> Result<Option<Vocabulary>>;
}

/// Desk lookup.
#[async_trait]
pub trait DeskLookup: Send + Sync {
    /// Get a desk by id.
    async fn find_desk(&self, id: &str) -> Result<Option<Desk>>;
}
