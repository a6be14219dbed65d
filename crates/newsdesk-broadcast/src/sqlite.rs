//! `SQLite` implementation of the collaborator traits.

use crate::store::{BroadcastQuery, ContentStore, DeskLookup, VocabularyLookup};
use async_trait::async_trait;
use newsdesk_db::{archive, desks, versions, vocabularies};
use newsdesk_db::{BroadcastRows, ContentItem, Desk, Result, Vocabulary};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

/// Content store, vocabulary and desk lookup backed by `newsdesk-db`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store over a migrated pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn find_one(&self, id: &str) -> Result<Option<ContentItem>> {
        archive::find_one(&self.pool, id).await
    }

    async fn find_broadcasts(
        &self,
        genre_value: &str,
        query: &BroadcastQuery,
    ) -> Result<BroadcastRows> {
        match query {
            BroadcastQuery::ForMaster { ids } => {
                archive::find_broadcasts_for(&self.pool, genre_value, ids).await
            }
            BroadcastQuery::ByRewrite { rewrite_id } => {
                archive::find_broadcasts_by_rewrite(&self.pool, genre_value, rewrite_id).await
            }
        }
    }

    async fn insert(&self, item: ContentItem) -> Result<ContentItem> {
        archive::insert(&self.pool, item).await
    }

    async fn system_update(
        &self,
        id: &str,
        updates: &Map<String, Value>,
        base: &ContentItem,
    ) -> Result<ContentItem> {
        archive::system_update(&self.pool, id, updates, base).await
    }

    async fn record_version(&self, item: &ContentItem) -> Result<()> {
        versions::insert_into_versions(&self.pool, item).await
    }
}

#[async_trait]
impl VocabularyLookup for SqliteStore {
    async fn get_vocabulary(&self, id: &str) -> Result<Option<Vocabulary>> {
        vocabularies::find_vocabulary(&self.pool, id).await
    }
}

#[async_trait]
impl DeskLookup for SqliteStore {
    async fn find_desk(&self, id: &str) -> Result<Option<Desk>> {
        desks::find_desk(&self.pool, id).await
    }
}
