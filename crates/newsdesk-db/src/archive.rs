//! Archive operations over content items.
//!
//! Master items and broadcast items live in the same `archive` table. Each row
//! keeps the full item as a JSON document plus a few projected columns (the
//! broadcast link ids and the lock owner) so that broadcast lookups do not have
//! to scan documents. The `version` column is the optimistic concurrency token:
//! every write bumps it and [`system_update`] only applies when the caller's
//! snapshot still carries the current value.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use newsdesk_core::{ItemState, ItemType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sqlx::{Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

/// Package type marking a takes package.
pub const TAKES_PACKAGE_TYPE: &str = "takes";

/// A content item as stored in the archive.
///
/// Fields this service does not model are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier (assigned on insert when empty)
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Content type; missing or null decodes as an unknown type
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub item_type: ItemType,
    /// Workflow state
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: ItemState,
    /// Groups all items derived from one story
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    /// Forward reference to the item that rewrote this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten_by: Option<String>,
    /// Packages this item is linked into
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_in_packages: Vec<PackageLink>,
    /// Genre tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre: Vec<Genre>,
    /// Broadcast metadata, present on broadcast items only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<BroadcastMeta>,
    /// Desk/stage/user assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    /// User currently editing the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_user: Option<String>,
    /// Urgency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<i64>,
    /// Priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// ANPA categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anpa_category: Option<Value>,
    /// Subject codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    /// Dateline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dateline: Option<Value>,
    /// Slugline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slugline: Option<String>,
    /// Place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Value>,
    /// Write version, mirrored from the `version` column
    #[serde(rename = "_current_version", default)]
    pub version: i64,
    /// Creation time
    #[serde(rename = "_created", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(rename = "_updated", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Any other document fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentItem {
    /// Create an empty item of the given type, not yet persisted.
    #[must_use]
    pub fn new(item_type: ItemType) -> Self {
        Self {
            id: String::new(),
            item_type,
            state: ItemState::default(),
            family_id: None,
            rewritten_by: None,
            linked_in_packages: Vec::new(),
            genre: Vec::new(),
            broadcast: None,
            task: None,
            lock_user: None,
            urgency: None,
            priority: None,
            anpa_category: None,
            subject: None,
            dateline: None,
            slugline: None,
            place: None,
            version: 0,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Id of the takes package enclosing this item, if any.
    #[must_use]
    pub fn takes_package_id(&self) -> Option<&str> {
        self.linked_in_packages
            .iter()
            .find(|link| link.package_type.as_deref() == Some(TAKES_PACKAGE_TYPE))
            .map(|link| link.package.as_str())
    }

    /// Whether any genre tag carries `value`.
    #[must_use]
    pub fn has_genre(&self, value: &str) -> bool {
        self.genre.iter().any(|genre| genre.value == value)
    }

    /// Whether a user currently holds the edit lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_user.as_deref().is_some_and(|user| !user.is_empty())
    }
}

/// Link from an item to a package it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLink {
    /// Package item id
    pub package: String,
    /// Package type (`takes` for takes packages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
}

/// One genre tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Vocabulary value
    #[serde(default)]
    pub value: String,
}

/// Desk/stage/user assignment of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Desk id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desk: Option<String>,
    /// Stage id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// User id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Why a broadcast item's status text was last set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusReason {
    /// A take was added to the master's package or the story was reopened
    NewTake,
    /// The master story was rewritten
    Rewrite,
    /// The master story was updated
    MasterUpdated,
    /// The master story was published
    MasterPublished,
    /// The master story was corrected
    MasterCorrected,
}

/// Synchronization metadata carried by broadcast items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMeta {
    /// Human readable synchronization status
    #[serde(default)]
    pub status: String,
    /// Item the broadcast item was derived from
    pub master_id: String,
    /// Takes package enclosing the master item
    #[serde(default)]
    pub takes_package_id: Option<String>,
    /// Rewrite of the master item
    #[serde(default)]
    pub rewrite_id: Option<String>,
    /// Why `status` was last set
    #[serde(default)]
    pub status_reason: Option<StatusReason>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of a broadcast lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastRows {
    /// Items that decoded
    pub items: Vec<ContentItem>,
    /// Ids of rows whose stored document could not be decoded
    pub undecodable: Vec<String>,
}

/// Get an item by id.
///
/// # Errors
/// Returns `DatabaseError` if the query fails or the stored document cannot be decoded.
pub async fn find_one(pool: &Pool<Sqlite>, id: &str) -> Result<Option<ContentItem>> {
    let row = sqlx::query("SELECT id, version, lock_user, doc FROM archive WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(decode_row).transpose()
}

/// Insert a new item.
///
/// A fresh UUID is assigned when `item.id` is empty. The stored item starts
/// at version 1 and is returned with its id and timestamps filled in.
///
/// # Errors
/// Returns `DatabaseError` if serialization or the insert fails (including a duplicate id).
pub async fn insert(pool: &Pool<Sqlite>, mut item: ContentItem) -> Result<ContentItem> {
    if item.id.is_empty() {
        item.id = Uuid::new_v4().to_string();
    }
    let now = Utc::now();
    item.version = 1;
    item.created_at = Some(now);
    item.updated_at = Some(now);

    let doc = serde_json::to_string(&item)?;
    let links = LinkColumns::from_item(&item);

    sqlx::query(
        "INSERT INTO archive
            (id, version, master_id, takes_package_id, rewrite_id, lock_user, doc, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(item.version)
    .bind(links.master_id)
    .bind(links.takes_package_id)
    .bind(links.rewrite_id)
    .bind(&item.lock_user)
    .bind(doc)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(pool)
    .await?;

    tracing::debug!("Inserted archive item {}", item.id);
    Ok(item)
}

/// Apply top-level field `updates` to an item, conditional on `base` being current.
///
/// The update bypasses user-facing validation; it is meant for internal
/// consistency fix-ups. Each key in `updates` replaces the same key of the
/// stored document. The write only happens when the stored version still
/// equals `base.version`.
///
/// Returns the item as written.
///
/// # Errors
/// - `DatabaseError::NotFoundWithMessage` if the item no longer exists
/// - `DatabaseError::VersionConflict` if the item was written since `base` was read
/// - `DatabaseError::SerializationError` if the merged document is not a valid item
pub async fn system_update(
    pool: &Pool<Sqlite>,
    id: &str,
    updates: &Map<String, Value>,
    base: &ContentItem,
) -> Result<ContentItem> {
    let now = Utc::now();
    let next_version = base.version + 1;

    let mut patch = updates.clone();
    patch.insert("_current_version".to_string(), Value::from(next_version));
    patch.insert("_updated".to_string(), serde_json::to_value(now)?);

    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(fields) = &mut merged {
        for (key, value) in &patch {
            fields.insert(key.clone(), value.clone());
        }
    }
    let updated: ContentItem = serde_json::from_value(merged)?;
    let links = LinkColumns::from_item(&updated);

    let result = sqlx::query(
        "UPDATE archive
         SET doc = json_patch(doc, ?), version = ?, master_id = ?, takes_package_id = ?,
             rewrite_id = ?, lock_user = ?, updated_at = ?
         WHERE id = ? AND version = ?",
    )
    .bind(serde_json::to_string(&patch)?)
    .bind(next_version)
    .bind(links.master_id)
    .bind(links.takes_package_id)
    .bind(links.rewrite_id)
    .bind(&updated.lock_user)
    .bind(now.to_rfc3339())
    .bind(id)
    .bind(base.version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(rejection_for(pool, id, base.version).await?);
    }

    Ok(updated)
}

/// Work out why a conditional write touched no rows.
async fn rejection_for(pool: &Pool<Sqlite>, id: &str, expected: i64) -> Result<DatabaseError> {
    let current: Option<i64> = sqlx::query_scalar("SELECT version FROM archive WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(match current {
        None => DatabaseError::NotFoundWithMessage(format!("Archive item '{id}' not found")),
        Some(_) => DatabaseError::VersionConflict {
            id: id.to_string(),
            expected,
        },
    })
}

/// Take the edit lock on an item for `user`.
///
/// # Errors
/// Returns `DatabaseError::NotFoundWithMessage` if the item does not exist.
pub async fn lock_item(pool: &Pool<Sqlite>, id: &str, user: &str) -> Result<()> {
    set_lock(pool, id, Some(user)).await
}

/// Release the edit lock on an item.
///
/// # Errors
/// Returns `DatabaseError::NotFoundWithMessage` if the item does not exist.
pub async fn unlock_item(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
    set_lock(pool, id, None).await
}

async fn set_lock(pool: &Pool<Sqlite>, id: &str, user: Option<&str>) -> Result<()> {
    let result = sqlx::query(
        "UPDATE archive
         SET lock_user = ?1,
             doc = json_set(doc, '$.lock_user', ?1, '$._current_version', version + 1),
             version = version + 1,
             updated_at = ?2
         WHERE id = ?3",
    )
    .bind(user)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFoundWithMessage(format!(
            "Archive item '{id}' not found"
        )));
    }

    Ok(())
}

/// Get broadcast items whose master or takes package id is one of `ids`.
///
/// Only rows carrying the `genre_value` genre are returned. A row whose
/// document does not decode is listed in `undecodable` and the others are
/// still returned.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn find_broadcasts_for(
    pool: &Pool<Sqlite>,
    genre_value: &str,
    ids: &[String],
) -> Result<BroadcastRows> {
    if ids.is_empty() {
        return Ok(BroadcastRows::default());
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, version, lock_user, doc FROM archive WHERE (master_id IN (",
    );
    let mut master_ids = query.separated(", ");
    for id in ids {
        master_ids.push_bind(id.as_str());
    }
    query.push(") OR takes_package_id IN (");
    let mut package_ids = query.separated(", ");
    for id in ids {
        package_ids.push_bind(id.as_str());
    }
    query.push(")) AND ");
    push_genre_filter(&mut query, genre_value);
    query.push(" ORDER BY created_at ASC, id ASC");

    let rows = query.build().fetch_all(pool).await?;
    Ok(partition_rows(&rows))
}

/// Get broadcast items whose rewrite reference equals `rewrite_id`.
///
/// Decoding failures are handled as in [`find_broadcasts_for`].
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn find_broadcasts_by_rewrite(
    pool: &Pool<Sqlite>,
    genre_value: &str,
    rewrite_id: &str,
) -> Result<BroadcastRows> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, version, lock_user, doc FROM archive WHERE rewrite_id = ",
    );
    query.push_bind(rewrite_id);
    query.push(" AND ");
    push_genre_filter(&mut query, genre_value);
    query.push(" ORDER BY created_at ASC, id ASC");

    let rows = query.build().fetch_all(pool).await?;
    Ok(partition_rows(&rows))
}

fn push_genre_filter<'a>(query: &mut QueryBuilder<'a, Sqlite>, genre_value: &'a str) {
    query.push(
        "EXISTS (SELECT 1 FROM json_each(archive.doc, '$.genre') AS g
                 WHERE json_extract(g.value, '$.value') = ",
    );
    query.push_bind(genre_value);
    query.push(")");
}

/// Projected link columns of a row.
struct LinkColumns {
    master_id: Option<String>,
    takes_package_id: Option<String>,
    rewrite_id: Option<String>,
}

impl LinkColumns {
    fn from_item(item: &ContentItem) -> Self {
        match &item.broadcast {
            Some(meta) => Self {
                master_id: Some(meta.master_id.clone()),
                takes_package_id: meta.takes_package_id.clone(),
                rewrite_id: meta.rewrite_id.clone(),
            },
            None => Self {
                master_id: None,
                takes_package_id: None,
                rewrite_id: None,
            },
        }
    }
}

/// Decode rows one by one, setting aside the ones that fail.
fn partition_rows(rows: &[sqlx::sqlite::SqliteRow]) -> BroadcastRows {
    let mut batch = BroadcastRows::default();
    for row in rows {
        match decode_row(row) {
            Ok(item) => batch.items.push(item),
            Err(e) => {
                let id: String = row.get("id");
                tracing::error!("Skipping undecodable archive item {}: {}", id, e);
                batch.undecodable.push(id);
            }
        }
    }
    batch
}

/// Parse a database row into a `ContentItem`.
///
/// The `version` and `lock_user` columns win over the document copies.
fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<ContentItem> {
    let id: String = row.get("id");
    let doc: String = row.get("doc");
    let mut item: ContentItem = serde_json::from_str(&doc).map_err(|e| {
        DatabaseError::Decode(format!("invalid document for archive item '{id}': {e}"))
    })?;
    item.id = id;
    item.version = row.get("version");
    item.lock_user = row.try_get("lock_user").ok().flatten();
    Ok(item)
}
