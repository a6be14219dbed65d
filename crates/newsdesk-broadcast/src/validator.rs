//! Eligibility check for master items.

use crate::error::{BroadcastError, Result};
use crate::genre::{BroadcastGenre, ItemKind};
use newsdesk_db::ContentItem;

/// Check that `item` may spawn a broadcast item.
///
/// Broadcast items can only be created for text or preformatted items that
/// are not killed, scheduled or spiked, and never from another broadcast item.
/// Checks run in that order, so a missing item is reported before anything else.
pub fn validate<'a>(
    item: Option<&'a ContentItem>,
    genre: &BroadcastGenre,
) -> Result<&'a ContentItem> {
    let item = item.ok_or(BroadcastError::NotFound)?;

    if !item.item_type.is_broadcastable() {
        return Err(BroadcastError::InvalidType);
    }

    if item.state.blocks_broadcast() {
        return Err(BroadcastError::InvalidState);
    }

    match genre.classify(item) {
        ItemKind::Master(master) => Ok(master),
        ItemKind::Broadcast(_) => Err(BroadcastError::InvalidType),
    }
}
