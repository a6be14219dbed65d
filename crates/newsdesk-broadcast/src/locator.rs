//! Finding the broadcast items derived from a master item.

use crate::genre::{BroadcastGenre, ItemKind};
use crate::store::{BroadcastQuery, ContentStore};
use newsdesk_db::{BroadcastRows, ContentItem, Result};

/// Get the broadcast items derived from `item`.
///
/// Matches on the item's own id and on its enclosing takes package id, so a
/// broadcast item created from one take is found from any later take of the
/// same package. Broadcast items have no derivatives; for them the result is
/// empty without a query.
///
/// Derived items whose stored document cannot be read are listed by id in
/// `undecodable`.
pub async fn find_for_master<S>(
    store: &S,
    genre: &BroadcastGenre,
    item: &ContentItem,
) -> Result<BroadcastRows>
where
    S: ContentStore + ?Sized,
{
    let ItemKind::Master(master) = genre.classify(item) else {
        return Ok(BroadcastRows::default());
    };

    let query = BroadcastQuery::ForMaster {
        ids: candidate_ids(master),
    };
    store.find_broadcasts(genre.value(), &query).await
}

fn candidate_ids(master: &ContentItem) -> Vec<String> {
    let mut ids = vec![master.id.clone()];
    if let Some(package_id) = master.takes_package_id() {
        ids.push(package_id.to_string());
    }
    ids
}
