//! Desk lookup.
//!
//! Desks own an incoming stage; items assigned to a desk without an explicit
//! stage land there.

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A newsroom desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desk {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Stage that receives newly assigned items
    pub incoming_stage: Option<String>,
}

/// Create a desk. A fresh UUID is assigned when `id` is `None`.
pub async fn insert_desk(
    pool: &SqlitePool,
    id: Option<String>,
    name: impl Into<String>,
    incoming_stage: Option<String>,
) -> Result<Desk> {
    let desk = Desk {
        id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: name.into(),
        incoming_stage,
    };

    sqlx::query("INSERT INTO desks (id, name, incoming_stage, created_at) VALUES (?, ?, ?, ?)")
        .bind(&desk.id)
        .bind(&desk.name)
        .bind(&desk.incoming_stage)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(desk)
}

/// Get a desk by id.
pub async fn find_desk(pool: &SqlitePool, id: &str) -> Result<Option<Desk>> {
    let row = sqlx::query("SELECT id, name, incoming_stage FROM desks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Desk {
        id: row.get("id"),
        name: row.get("name"),
        incoming_stage: row.try_get("incoming_stage").ok().flatten(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_insert_and_find_desk() {
        let db = Database::new(":memory:", 1)
            .await
            .expect("create database");
        db.run_migrations().await.expect("run migrations");
        let pool = db.pool();

        let desk = insert_desk(pool, None, "Sports", Some("stage-incoming".to_string()))
            .await
            .expect("insert desk");

        let found = find_desk(pool, &desk.id)
            .await
            .expect("query desk")
            .expect("desk exists");
        assert_eq!(found, desk);
        assert_eq!(found.incoming_stage.as_deref(), Some("stage-incoming"));

        assert!(find_desk(pool, "missing").await.expect("query desk").is_none());
    }
}
