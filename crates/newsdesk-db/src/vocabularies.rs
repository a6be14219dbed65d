//! Controlled vocabularies.
//!
//! A vocabulary is an id plus a JSON list of `{ value, name }` entries. The
//! broadcast core reads the `genre` vocabulary to check that the broadcast
//! genre is configured.

use crate::error::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// One entry of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    /// Stored value
    #[serde(default)]
    pub value: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// A controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Vocabulary id (for example `genre`)
    pub id: String,
    /// Entries
    #[serde(default)]
    pub items: Vec<VocabularyItem>,
}

/// Insert or replace a vocabulary.
pub async fn upsert_vocabulary(pool: &SqlitePool, vocabulary: &Vocabulary) -> Result<()> {
    let items = serde_json::to_string(&vocabulary.items)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

    sqlx::query(
        r"
        INSERT INTO vocabularies (id, items, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            items = excluded.items,
            updated_at = datetime('now')
        ",
    )
    .bind(&vocabulary.id)
    .bind(items)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a vocabulary by id.
pub async fn find_vocabulary(pool: &SqlitePool, id: &str) -> Result<Option<Vocabulary>> {
    let row: Option<(String,)> = sqlx::query_as(
        r"
        SELECT items
        FROM vocabularies
        WHERE id = ?
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((items_str,)) => {
            let items: Vec<VocabularyItem> = serde_json::from_str(&items_str)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
            Ok(Some(Vocabulary {
                id: id.to_string(),
                items,
            }))
        }
        None => Ok(None),
    }
}
