//! Service facade bundling the store with broadcast settings.

use crate::creator::{self, CreateBroadcast};
use crate::error::Result;
use crate::event::MasterEvent;
use crate::genre::BroadcastGenre;
use crate::store::{ContentStore, DeskLookup, VocabularyLookup};
use crate::sync::SyncReport;
use crate::{cleaner, locator, sync};
use newsdesk_core::BroadcastConfig;
use newsdesk_db::ContentItem;

/// Runtime settings for broadcast handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastSettings {
    /// Genre marking broadcast items
    pub genre: BroadcastGenre,
    /// Vocabulary that must list the broadcast genre
    pub genre_vocabulary_id: String,
    /// Re-reads allowed after a version conflict on one derived item
    pub conflict_retries: u32,
}

impl From<&BroadcastConfig> for BroadcastSettings {
    fn from(config: &BroadcastConfig) -> Self {
        Self {
            genre: BroadcastGenre::new(config.genre_value.clone()),
            genre_vocabulary_id: config.genre_vocabulary_id.clone(),
            conflict_retries: config.conflict_retries,
        }
    }
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self::from(&BroadcastConfig::default())
    }
}

/// Broadcast operations over one store.
#[derive(Debug, Clone)]
pub struct BroadcastService<S> {
    store: S,
    settings: BroadcastSettings,
}

impl<S> BroadcastService<S>
where
    S: ContentStore + VocabularyLookup + DeskLookup,
{
    /// Create a service.
    pub fn new(store: S, settings: BroadcastSettings) -> Self {
        Self { store, settings }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &BroadcastSettings {
        &self.settings
    }

    /// See [`creator::create`].
    pub async fn create(&self, request: CreateBroadcast) -> Result<ContentItem> {
        creator::create(&self.store, &self.settings, request).await
    }

    /// See [`locator::find_for_master`]. Unreadable derived items are left out.
    pub async fn find_for_master(&self, item: &ContentItem) -> Result<Vec<ContentItem>> {
        let rows = locator::find_for_master(&self.store, &self.settings.genre, item).await?;
        Ok(rows.items)
    }

    /// See [`sync::on_master_event`].
    pub async fn on_master_event(
        &self,
        event: &MasterEvent,
        master: Option<&ContentItem>,
    ) -> SyncReport {
        sync::on_master_event(&self.store, &self.settings, event, master).await
    }

    /// See [`cleaner::on_rewrite_removed`].
    pub async fn on_rewrite_removed(&self, item: &ContentItem) -> SyncReport {
        cleaner::on_rewrite_removed(&self.store, &self.settings, item).await
    }
}
