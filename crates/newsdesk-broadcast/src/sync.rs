//! Propagating master item events to derived broadcast items.
//!
//! Each derived item is written on its own with a compare-and-swap against
//! the version that was read. A failure on one item is logged and counted;
//! it never reaches the caller.

use crate::event::{MasterEvent, SyncStatus};
use crate::genre::ItemKind;
use crate::locator;
use crate::service::BroadcastSettings;
use crate::store::ContentStore;
use newsdesk_db::{BroadcastMeta, ContentItem, DatabaseError};
use serde::Serialize;
use serde_json::Map;

/// What happened to each derived item during one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Items written
    pub updated: Vec<String>,
    /// Items that already carried the computed values
    pub unchanged: Vec<String>,
    /// Items skipped because a user holds the edit lock
    pub skipped_locked: Vec<String>,
    /// Items whose write failed
    pub failed: Vec<String>,
}

impl SyncReport {
    /// Number of derived items looked at.
    #[must_use]
    pub fn total(&self) -> usize {
        self.updated.len() + self.unchanged.len() + self.skipped_locked.len() + self.failed.len()
    }

    /// Whether no derived item was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Result of a conditional write on one derived item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Updated,
    Unchanged,
    Locked,
}

/// Update every broadcast item derived from `master` after `event`.
///
/// Absent items and broadcast items are ignored. Locked items are skipped,
/// `takes_package_id` and `rewrite_id` are only filled when empty.
pub async fn on_master_event<S>(
    store: &S,
    settings: &BroadcastSettings,
    event: &MasterEvent,
    master: Option<&ContentItem>,
) -> SyncReport
where
    S: ContentStore + ?Sized,
{
    let mut report = SyncReport::default();

    let Some(ItemKind::Master(master)) = master.map(|item| settings.genre.classify(item)) else {
        return report;
    };

    let broadcasts = match locator::find_for_master(store, &settings.genre, master).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(
                "Failed to find broadcast items for master item {}: {}",
                master.id,
                e
            );
            return report;
        }
    };

    let status = event.status();
    let takes_package_id = event.takes_package_id();
    let rewrite_id = event.rewrite_id();

    for id in broadcasts.undecodable {
        tracing::error!(
            "Failed to update status for the broadcast item {}: unreadable document",
            id
        );
        report.failed.push(id);
    }

    for broadcast in broadcasts.items {
        let id = broadcast.id.clone();
        let outcome = apply_delta(store, broadcast, settings.conflict_retries, |item| {
            status_delta(item, status, takes_package_id, rewrite_id)
        })
        .await;

        match outcome {
            Ok(outcome) => report.record(id, outcome),
            Err(e) => {
                tracing::error!("Failed to update status for the broadcast item {}: {}", id, e);
                report.failed.push(id);
            }
        }
    }

    tracing::debug!(
        "Master item {} event {:?}: {} updated, {} locked, {} failed",
        master.id,
        event,
        report.updated.len(),
        report.skipped_locked.len(),
        report.failed.len()
    );
    report
}

impl SyncReport {
    pub(crate) fn record(&mut self, id: String, outcome: Outcome) {
        match outcome {
            Outcome::Updated => self.updated.push(id),
            Outcome::Unchanged => self.unchanged.push(id),
            Outcome::Locked => {
                tracing::debug!("Broadcast item {} is locked, skipping", id);
                self.skipped_locked.push(id);
            }
        }
    }
}

/// New broadcast metadata for `item`, or `None` when nothing changes.
fn status_delta(
    item: &ContentItem,
    status: Option<SyncStatus>,
    takes_package_id: Option<&str>,
    rewrite_id: Option<&str>,
) -> Option<BroadcastMeta> {
    let current = item.broadcast.as_ref()?;
    let mut next = current.clone();

    if let Some(status) = status {
        next.status = status.text.to_string();
        next.status_reason = Some(status.reason);
    }
    fill_if_empty(&mut next.takes_package_id, takes_package_id);
    fill_if_empty(&mut next.rewrite_id, rewrite_id);

    (next != *current).then_some(next)
}

fn fill_if_empty(slot: &mut Option<String>, value: Option<&str>) {
    let empty = slot.as_deref().map_or(true, str::is_empty);
    if let (true, Some(value)) = (empty, value) {
        *slot = Some(value.to_string());
    }
}

/// Write the metadata computed by `delta` with a compare-and-swap on the
/// item version, re-reading the item after each conflict.
///
/// The lock check and `delta` run again on the fresh copy.
pub(crate) async fn apply_delta<S, F>(
    store: &S,
    item: ContentItem,
    retries: u32,
    delta: F,
) -> newsdesk_db::Result<Outcome>
where
    S: ContentStore + ?Sized,
    F: Fn(&ContentItem) -> Option<BroadcastMeta>,
{
    let mut current = item;
    let mut attempt = 0;

    loop {
        if current.is_locked() {
            return Ok(Outcome::Locked);
        }
        let Some(meta) = delta(&current) else {
            return Ok(Outcome::Unchanged);
        };

        let mut updates = Map::new();
        updates.insert("broadcast".to_string(), serde_json::to_value(&meta)?);

        match store.system_update(&current.id, &updates, &current).await {
            Ok(_) => return Ok(Outcome::Updated),
            Err(e) if e.is_conflict() && attempt < retries => {
                attempt += 1;
                tracing::debug!(
                    "Version conflict on broadcast item {}, retry {}/{}",
                    current.id,
                    attempt,
                    retries
                );
                current = store.find_one(&current.id).await?.ok_or_else(|| {
                    DatabaseError::NotFoundWithMessage(format!(
                        "Archive item '{}' not found",
                        current.id
                    ))
                })?;
            }
            Err(e) => return Err(e),
        }
    }
}
