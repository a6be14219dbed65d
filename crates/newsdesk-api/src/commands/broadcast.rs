//! Broadcast item commands: the POST handler and the workflow hooks.

use crate::error::CommandError;
use crate::hateoas::{archive_item_links, Links};
use crate::state::AppState;
use newsdesk_broadcast::{ContentStore, CreateBroadcast, MasterEvent, SyncReport};
use newsdesk_core::ItemId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response to a successful POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastCreated {
    /// Id of the new broadcast item
    #[serde(rename = "_id")]
    pub id: String,
    /// Hypermedia links
    #[serde(rename = "_links")]
    pub links: Links,
}

/// A master item lifecycle notification from the workflow system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterEventPayload {
    /// Workflow operation ("create", "update", "publish", "correct", ...)
    pub event: String,
    /// Item the operation was performed on
    pub item_id: String,
    /// Takes package the new item joined
    #[serde(default)]
    pub takes_package_id: Option<String>,
    /// The rewrite item
    #[serde(default)]
    pub rewrite_id: Option<String>,
}

/// `POST archive/<item_id>/broadcast`
///
/// `body` is `{ "desk": <id|null>, ...fields }`; the extra fields seed the new
/// item before the master's fields are copied over it.
pub async fn create_broadcast(
    state: &AppState,
    item_id: &str,
    user_id: Option<&str>,
    body: Value,
) -> Result<BroadcastCreated, CommandError> {
    let item_id = ItemId::new(item_id)?;
    let mut overrides = match body {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        _ => return Err(CommandError::invalid_request("Request body must be an object")),
    };

    let desk_id = match overrides.remove("desk") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id),
        Some(other) => {
            return Err(CommandError::with_details(
                "INVALID_REQUEST",
                400,
                "desk must be a desk id or null",
                serde_json::json!({ "desk": other }),
            ))
        }
    };

    let request = CreateBroadcast {
        master_item_id: item_id.into_inner(),
        desk_id,
        user_id: user_id.map(str::to_string),
        overrides,
    };

    let created = state.broadcast.create(request).await?;
    Ok(BroadcastCreated {
        links: archive_item_links(&created.id),
        id: created.id,
    })
}

/// Run the synchronizer for a master item event.
///
/// An unknown item id yields an empty report.
pub async fn notify_master_event(
    state: &AppState,
    payload: MasterEventPayload,
) -> Result<SyncReport, CommandError> {
    let item_id = ItemId::new(payload.item_id)?;
    let item = state.broadcast.store().find_one(item_id.as_str()).await?;

    let event = MasterEvent::parse(
        &payload.event,
        payload.takes_package_id.as_deref(),
        payload.rewrite_id.as_deref(),
    );
    Ok(state.broadcast.on_master_event(&event, item.as_ref()).await)
}

/// Run the rewrite link cleaner for an item whose rewrite was removed.
///
/// An unknown item id yields an empty report.
pub async fn notify_rewrite_removed(
    state: &AppState,
    item_id: &str,
) -> Result<SyncReport, CommandError> {
    let item_id = ItemId::new(item_id)?;
    let Some(item) = state.broadcast.store().find_one(item_id.as_str()).await? else {
        tracing::debug!("Rewrite removal for unknown item {}", item_id);
        return Ok(SyncReport::default());
    };
    Ok(state.broadcast.on_rewrite_removed(&item).await)
}
