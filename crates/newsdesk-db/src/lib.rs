//! Newsdesk Database Layer
//!
//! Provides the `SQLite` content store behind the newsdesk services. Uses `SQLx`
//! with embedded, versioned migrations.
//!
//! # Architecture
//!
//! - **Archive**: master and broadcast items share one table of JSON documents
//!   with projected link columns for broadcast lookups
//! - **Optimistic concurrency**: every write bumps the row version and
//!   `archive::system_update` only applies against the current version
//! - **Versions**: snapshots recorded per item version
//! - **Vocabularies / desks**: lookups consumed by broadcast creation
//!
//! # Example
//!
//! ```ignore
//! use newsdesk_db::Database;
//!
//! let db = Database::new("newsdesk.db", 5).await?;
//! db.run_migrations().await?;
//! let item = newsdesk_db::archive::find_one(db.pool(), "item-id").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod archive;
pub mod connection;
pub mod desks;
pub mod error;
pub mod migrations;
pub mod versions;
pub mod vocabularies;

// Re-export commonly used types
pub use archive::{
    BroadcastMeta, BroadcastRows, ContentItem, Genre, PackageLink, StatusReason, Task,
};
pub use connection::ContentPool;
pub use desks::Desk;
pub use error::{DatabaseError, Result};
pub use versions::ItemVersion;
pub use vocabularies::{Vocabulary, VocabularyItem};

use newsdesk_core::DatabaseConfig;
use std::path::Path;

/// High-level database interface with migrations.
#[derive(Debug, Clone)]
pub struct Database {
    pool: ContentPool,
}

impl Database {
    /// Open a database at `path` (or `:memory:` for in-memory).
    ///
    /// # Errors
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let pool = ContentPool::new(path, max_connections).await?;
        Ok(Self { pool })
    }

    /// Open the database described by the `[database]` config section.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.max_connections).await
    }

    /// Create a database instance from an existing pool.
    #[must_use]
    pub fn from_content_pool(pool: ContentPool) -> Self {
        Self { pool }
    }

    /// Run all pending database migrations.
    ///
    /// # Errors
    /// Returns `DatabaseError::Migration` if any migration fails.
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(self.pool.pool()).await
    }

    /// Get the current schema version.
    pub async fn get_schema_version(&self) -> Result<i64> {
        migrations::get_schema_version(self.pool.pool()).await
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        self.pool.pool()
    }

    /// Check that the database answers queries.
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    /// Close the database connection gracefully.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
