//! Removing stale rewrite references from broadcast items.

use crate::event::REWRITE_PHRASE;
use crate::service::BroadcastSettings;
use crate::store::{BroadcastQuery, ContentStore};
use crate::sync::{apply_delta, SyncReport};
use newsdesk_db::{BroadcastMeta, ContentItem, StatusReason};

/// Clear `rewrite_id` on every broadcast item that points at `item`.
///
/// A status announcing the rewrite is reset to empty. Broadcast items passed
/// as `item` are ignored and locked items are skipped.
pub async fn on_rewrite_removed<S>(
    store: &S,
    settings: &BroadcastSettings,
    item: &ContentItem,
) -> SyncReport
where
    S: ContentStore + ?Sized,
{
    let mut report = SyncReport::default();
    if settings.genre.is_broadcast(item) {
        return report;
    }

    let query = BroadcastQuery::ByRewrite {
        rewrite_id: item.id.clone(),
    };
    let broadcasts = match store.find_broadcasts(settings.genre.value(), &query).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(
                "Failed to find broadcast items rewritten by {}: {}",
                item.id,
                e
            );
            return report;
        }
    };

    for id in broadcasts.undecodable {
        tracing::error!(
            "Failed to remove rewrite id for the broadcast item {}: unreadable document",
            id
        );
        report.failed.push(id);
    }

    for broadcast in broadcasts.items {
        let id = broadcast.id.clone();
        let outcome = apply_delta(store, broadcast, settings.conflict_retries, |current| {
            removal_delta(current, &item.id)
        })
        .await;

        match outcome {
            Ok(outcome) => report.record(id, outcome),
            Err(e) => {
                tracing::error!("Failed to remove rewrite id for the broadcast item {}: {}", id, e);
                report.failed.push(id);
            }
        }
    }

    report
}

/// Metadata with the rewrite reference dropped, or `None` once another
/// writer already moved it away from `rewrite_id`.
fn removal_delta(item: &ContentItem, rewrite_id: &str) -> Option<BroadcastMeta> {
    let current = item.broadcast.as_ref()?;
    if current.rewrite_id.as_deref() != Some(rewrite_id) {
        return None;
    }

    let mut next = current.clone();
    next.rewrite_id = None;
    if announces_rewrite(current) {
        next.status = String::new();
        next.status_reason = None;
    }
    Some(next)
}

fn announces_rewrite(meta: &BroadcastMeta) -> bool {
    match meta.status_reason {
        Some(reason) => reason == StatusReason::Rewrite,
        None => meta.status.contains(REWRITE_PHRASE),
    }
}
