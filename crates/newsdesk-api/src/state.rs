//! Application state management.

use newsdesk_broadcast::{BroadcastService, BroadcastSettings, SqliteStore};
use newsdesk_core::AppConfig;
use newsdesk_db::{Database, Result};

/// State shared across all command handlers.
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,
    /// Content store
    pub db: Database,
    /// Broadcast operations over `db`
    pub broadcast: BroadcastService<SqliteStore>,
}

impl AppState {
    /// Open the configured database, apply migrations and build the services.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let db = Database::from_config(&config.database).await?;
        db.run_migrations().await?;

        tracing::info!(
            "Content store ready at {} (schema version {})",
            config.database.path.display(),
            db.get_schema_version().await?
        );

        let store = SqliteStore::new(db.pool().clone());
        let broadcast = BroadcastService::new(store, BroadcastSettings::from(&config.broadcast));

        Ok(Self {
            config,
            db,
            broadcast,
        })
    }
}
