//! Fixtures and store wrappers for unit tests.

use crate::genre::BroadcastGenre;
use crate::sqlite::SqliteStore;
use crate::store::{BroadcastQuery, ContentStore, DeskLookup, VocabularyLookup};
use async_trait::async_trait;
use newsdesk_core::ItemType;
use newsdesk_db::{archive, vocabularies};
use newsdesk_db::{
    BroadcastMeta, BroadcastRows, ContentItem, Database, DatabaseError, Desk, Genre, PackageLink,
    Result, Vocabulary, VocabularyItem,
};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// Migrated in-memory store with the genre vocabulary configured.
pub(crate) async fn seeded_store() -> (SqliteStore, BroadcastGenre) {
    let db = Database::new(":memory:", 1)
        .await
        .expect("create database");
    db.run_migrations().await.expect("run migrations");

    let genre = BroadcastGenre::default();
    let vocabulary = Vocabulary {
        id: "genre".to_string(),
        items: vec![
            VocabularyItem {
                value: "Article".to_string(),
                name: "Article".to_string(),
            },
            VocabularyItem {
                value: genre.value().to_string(),
                name: genre.value().to_string(),
            },
        ],
    };
    vocabularies::upsert_vocabulary(db.pool(), &vocabulary)
        .await
        .expect("seed genre vocabulary");

    (SqliteStore::new(db.pool().clone()), genre)
}

pub(crate) fn text_master(id: &str) -> ContentItem {
    let mut item = ContentItem::new(ItemType::Text);
    item.id = id.to_string();
    item.family_id = Some(format!("family-{id}"));
    item
}

pub(crate) fn take_of(id: &str, package_id: &str) -> ContentItem {
    let mut item = text_master(id);
    item.linked_in_packages.push(PackageLink {
        package: package_id.to_string(),
        package_type: Some("takes".to_string()),
    });
    item
}

pub(crate) fn broadcast_of(genre: &BroadcastGenre, id: &str, master: &ContentItem) -> ContentItem {
    let mut item = ContentItem::new(ItemType::Text);
    item.id = id.to_string();
    item.genre.push(Genre {
        name: genre.value().to_string(),
        value: genre.value().to_string(),
    });
    item.broadcast = Some(BroadcastMeta {
        master_id: master.id.clone(),
        takes_package_id: master.takes_package_id().map(str::to_string),
        ..BroadcastMeta::default()
    });
    item
}

/// Store a broadcast row whose document no longer decodes as an item.
pub(crate) async fn insert_unreadable_broadcast(
    store: &SqliteStore,
    genre: &BroadcastGenre,
    id: &str,
    master_id: &str,
    rewrite_id: Option<&str>,
) {
    let doc = serde_json::json!({
        "_id": id,
        "type": "text",
        "urgency": "high",
        "genre": [{ "name": genre.value(), "value": genre.value() }],
        "broadcast": { "master_id": master_id, "rewrite_id": rewrite_id, "status": "" },
    });
    sqlx::query(
        "INSERT INTO archive (id, version, master_id, rewrite_id, doc, created_at, updated_at)
         VALUES (?, 1, ?, ?, ?, datetime('now'), datetime('now'))",
    )
    .bind(id)
    .bind(master_id)
    .bind(rewrite_id)
    .bind(doc.to_string())
    .execute(store.pool())
    .await
    .expect("insert unreadable row");
}

/// Rejects `system_update` for one item id.
pub(crate) struct FailingStore {
    pub inner: SqliteStore,
    pub fail_id: String,
}

/// Lets another writer touch an item between the caller's read and write,
/// once.
pub(crate) struct RacingStore {
    pub inner: SqliteStore,
    pub race: Race,
    pub fired: AtomicBool,
}

pub(crate) enum Race {
    /// Concurrent writer fills `broadcast.takes_package_id`.
    FillTakes(String),
    /// A user takes the edit lock.
    Lock(String),
}

macro_rules! delegate_lookups {
    ($store:ty) => {
        #[async_trait]
        impl VocabularyLookup for $store {
            async fn get_vocabulary(&self, id: &str) -> Result<Option<Vocabulary>> {
                self.inner.get_vocabulary(id).await
            }
        }

        #[async_trait]
        impl DeskLookup for $store {
            async fn find_desk(&self, id: &str) -> Result<Option<Desk>> {
                self.inner.find_desk(id).await
            }
        }
    };
}

delegate_lookups!(FailingStore);
delegate_lookups!(RacingStore);

#[async_trait]
impl ContentStore for FailingStore {
    async fn find_one(&self, id: &str) -> Result<Option<ContentItem>> {
        self.inner.find_one(id).await
    }

    async fn find_broadcasts(
        &self,
        genre_value: &str,
        query: &BroadcastQuery,
    ) -> Result<BroadcastRows> {
        self.inner.find_broadcasts(genre_value, query).await
    }

    async fn insert(&self, item: ContentItem) -> Result<ContentItem> {
        self.inner.insert(item).await
    }

    async fn system_update(
        &self,
        id: &str,
        updates: &Map<String, Value>,
        base: &ContentItem,
    ) -> Result<ContentItem> {
        if id == self.fail_id {
            return Err(DatabaseError::Decode(format!("injected failure for {id}")));
        }
        self.inner.system_update(id, updates, base).await
    }

    async fn record_version(&self, item: &ContentItem) -> Result<()> {
        self.inner.record_version(item).await
    }
}

#[async_trait]
impl ContentStore for RacingStore {
    async fn find_one(&self, id: &str) -> Result<Option<ContentItem>> {
        self.inner.find_one(id).await
    }

    async fn find_broadcasts(
        &self,
        genre_value: &str,
        query: &BroadcastQuery,
    ) -> Result<BroadcastRows> {
        self.inner.find_broadcasts(genre_value, query).await
    }

    async fn insert(&self, item: ContentItem) -> Result<ContentItem> {
        self.inner.insert(item).await
    }

    async fn system_update(
        &self,
        id: &str,
        updates: &Map<String, Value>,
        base: &ContentItem,
    ) -> Result<ContentItem> {
        if !self.fired.swap(true, Ordering::SeqCst) {
            let pool = self.inner.pool();
            match &self.race {
                Race::FillTakes(package_id) => {
                    let mut meta = base.broadcast.clone().unwrap_or_default();
                    meta.takes_package_id = Some(package_id.clone());
                    let mut concurrent = Map::new();
                    concurrent.insert(
                        "broadcast".to_string(),
                        serde_json::to_value(meta).expect("serialize meta"),
                    );
                    archive::system_update(pool, id, &concurrent, base).await?;
                }
                Race::Lock(user) => archive::lock_item(pool, id, user).await?,
            }
        }
        self.inner.system_update(id, updates, base).await
    }

    async fn record_version(&self, item: &ContentItem) -> Result<()> {
        self.inner.record_version(item).await
    }
}

impl RacingStore {
    pub(crate) fn new(inner: SqliteStore, race: Race) -> Self {
        Self {
            inner,
            race,
            fired: AtomicBool::new(false),
        }
    }
}
