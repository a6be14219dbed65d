//! Creating a broadcast item from a master item.

use crate::error::{BroadcastError, Result};
use crate::service::BroadcastSettings;
use crate::store::{ContentStore, DeskLookup, VocabularyLookup};
use crate::validator;
use newsdesk_db::{BroadcastMeta, ContentItem, Genre, Task};
use serde_json::{Map, Value};

/// Fields copied verbatim from the master item. They are never re-synced.
pub const COPIED_FIELDS: [&str; 8] = [
    "urgency",
    "priority",
    "anpa_category",
    "type",
    "subject",
    "dateline",
    "slugline",
    "place",
];

/// Keys a request may not set on the new item.
const RESERVED_KEYS: [&str; 6] = [
    "_id",
    "_current_version",
    "_created",
    "_updated",
    "lock_user",
    "desk",
];

/// A request to derive a broadcast item.
#[derive(Debug, Clone, Default)]
pub struct CreateBroadcast {
    /// Id of the master item
    pub master_item_id: String,
    /// Desk whose incoming stage receives the new item
    pub desk_id: Option<String>,
    /// Acting user, assigned to the task
    pub user_id: Option<String>,
    /// Extra fields for the new item. Everything the creator derives from
    /// the master item wins over these.
    pub overrides: Map<String, Value>,
}

impl CreateBroadcast {
    /// Request a broadcast item for `master_item_id` with no desk and no overrides.
    pub fn new(master_item_id: impl Into<String>) -> Self {
        Self {
            master_item_id: master_item_id.into(),
            ..Self::default()
        }
    }
}

/// Create a broadcast item and record its first version.
///
/// Returns the stored item; its id is the new broadcast item id.
///
/// # Errors
/// - `NotFound`, `InvalidType`, `InvalidState` from validation of the master item
/// - `Config` if the genre vocabulary has no broadcast entry
/// - `Serialization` if an override does not fit its field
/// - `Database` if a store call fails
pub async fn create<S>(
    store: &S,
    settings: &BroadcastSettings,
    request: CreateBroadcast,
) -> Result<ContentItem>
where
    S: ContentStore + VocabularyLookup + DeskLookup + ?Sized,
{
    let found = store.find_one(&request.master_item_id).await?;
    let master = validator::validate(found.as_ref(), &settings.genre)?;

    let task = resolve_task(store, request.desk_id.as_deref(), request.user_id).await?;
    let genre = resolve_genre(store, settings).await?;

    let mut doc = request.overrides;
    for key in RESERVED_KEYS {
        doc.remove(key);
    }
    // `type` is required to decode; the copied value replaces it below.
    doc.insert("type".to_string(), serde_json::to_value(&master.item_type)?);
    let mut item: ContentItem = serde_json::from_value(Value::Object(doc))?;

    item.task = Some(task);
    item.genre = genre;
    item.broadcast = Some(BroadcastMeta {
        status: String::new(),
        master_id: master.id.clone(),
        takes_package_id: master.takes_package_id().map(str::to_string),
        rewrite_id: master.rewritten_by.clone(),
        status_reason: None,
    });
    item.family_id.clone_from(&master.family_id);
    copy_fields(master, &mut item);

    let item = store.insert(item).await?;
    store.record_version(&item).await?;

    tracing::info!(
        "Created broadcast item {} from master item {}",
        item.id,
        master.id
    );
    Ok(item)
}

async fn resolve_task<S>(store: &S, desk_id: Option<&str>, user_id: Option<String>) -> Result<Task>
where
    S: DeskLookup + ?Sized,
{
    let mut task = Task {
        user: user_id,
        ..Task::default()
    };

    let Some(desk_id) = desk_id.filter(|id| !id.is_empty()) else {
        return Ok(task);
    };

    match store.find_desk(desk_id).await? {
        Some(desk) => {
            task.desk = Some(desk.id);
            task.stage = desk.incoming_stage;
        }
        None => tracing::warn!("Desk {} not found, broadcast item left unassigned", desk_id),
    }
    Ok(task)
}

async fn resolve_genre<S>(store: &S, settings: &BroadcastSettings) -> Result<Vec<Genre>>
where
    S: VocabularyLookup + ?Sized,
{
    let vocabulary = store.get_vocabulary(&settings.genre_vocabulary_id).await?;
    let genre: Vec<Genre> = vocabulary
        .map(|vocabulary| vocabulary.items)
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| entry.value == settings.genre.value())
        .map(|entry| Genre {
            name: entry.name,
            value: entry.value,
        })
        .collect();

    if genre.is_empty() {
        return Err(BroadcastError::Config {
            genre: settings.genre.value().to_string(),
        });
    }
    Ok(genre)
}

fn copy_fields(master: &ContentItem, item: &mut ContentItem) {
    item.urgency = master.urgency;
    item.priority = master.priority;
    item.anpa_category.clone_from(&master.anpa_category);
    item.item_type.clone_from(&master.item_type);
    item.subject.clone_from(&master.subject);
    item.dateline.clone_from(&master.dateline);
    item.slugline.clone_from(&master.slugline);
    item.place.clone_from(&master.place);
}
