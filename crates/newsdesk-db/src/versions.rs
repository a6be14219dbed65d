//! Version history for archive items.
//!
//! Each call to [`insert_into_versions`] stores a snapshot of the item at its
//! current version in `archive_versions`.

use crate::archive::ContentItem;
use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};

/// A recorded snapshot of an item.
#[derive(Debug, Clone)]
pub struct ItemVersion {
    /// Item identifier
    pub item_id: String,
    /// Version the snapshot was taken at
    pub version: i64,
    /// The item as it was at `version`
    pub item: ContentItem,
    /// When the snapshot was recorded
    pub created_at: DateTime<Utc>,
}

/// Record the current state of `item` in the version history.
///
/// # Errors
/// Returns `DatabaseError` if the snapshot cannot be serialized or the same
/// version was already recorded.
pub async fn insert_into_versions(pool: &Pool<Sqlite>, item: &ContentItem) -> Result<()> {
    let doc = serde_json::to_string(item)?;

    sqlx::query(
        "INSERT INTO archive_versions (item_id, version, doc, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(item.version)
    .bind(doc)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    tracing::debug!("Recorded version {} of archive item {}", item.version, item.id);
    Ok(())
}

/// Get all recorded versions of an item, oldest first.
///
/// # Errors
/// Returns `DatabaseError` if the query fails or a snapshot cannot be decoded.
pub async fn get_versions(pool: &Pool<Sqlite>, item_id: &str) -> Result<Vec<ItemVersion>> {
    let rows = sqlx::query(
        "SELECT item_id, version, doc, created_at FROM archive_versions
         WHERE item_id = ? ORDER BY version ASC",
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<ItemVersion> {
            let doc: String = row.get("doc");
            let item: ContentItem = serde_json::from_str(&doc)
                .map_err(|e| DatabaseError::Decode(format!("invalid version snapshot: {e}")))?;

            let created_at_str: String = row.get("created_at");
            let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                .map_err(|e| DatabaseError::Decode(e.to_string()))?
                .with_timezone(&Utc);

            Ok(ItemVersion {
                item_id: row.get("item_id"),
                version: row.get("version"),
                item,
                created_at,
            })
        })
        .collect()
}
