use newsdesk_broadcast::{
    BroadcastError, BroadcastService, BroadcastSettings, CreateBroadcast, MasterEvent,
    SqliteStore,
};
use newsdesk_core::{ItemState, ItemType};
use newsdesk_db::{archive, vocabularies, ContentItem, Database, PackageLink, Vocabulary, VocabularyItem};
use serde_json::json;

/// Helper to open a migrated in-memory store with the broadcast genre configured
async fn create_service() -> BroadcastService<SqliteStore> {
    let db = Database::new(":memory:", 1)
        .await
        .expect("create database");
    db.run_migrations().await.expect("run migrations");

    vocabularies::upsert_vocabulary(
        db.pool(),
        &Vocabulary {
            id: "genre".to_string(),
            items: vec![VocabularyItem {
                value: "Broadcast Script".to_string(),
                name: "Broadcast Script".to_string(),
            }],
        },
    )
    .await
    .expect("seed genre vocabulary");

    BroadcastService::new(
        SqliteStore::new(db.pool().clone()),
        BroadcastSettings::default(),
    )
}

fn master(id: &str) -> ContentItem {
    let mut item = ContentItem::new(ItemType::Text);
    item.id = id.to_string();
    item.state = ItemState::Draft;
    item.family_id = Some(id.to_string());
    item.urgency = Some(2);
    item.slugline = Some("floods".to_string());
    item.subject = Some(json!([{"qcode": "06000000", "name": "environmental issue"}]));
    item
}

async fn reload(service: &BroadcastService<SqliteStore>, id: &str) -> ContentItem {
    archive::find_one(service.store().pool(), id)
        .await
        .expect("find item")
        .expect("item exists")
}

#[tokio::test]
async fn test_create_from_plain_master() {
    let service = create_service().await;
    archive::insert(service.store().pool(), master("m1"))
        .await
        .expect("insert master");

    let created = service
        .create(CreateBroadcast::new("m1"))
        .await
        .expect("create broadcast");

    let stored = reload(&service, &created.id).await;
    let meta = stored.broadcast.as_ref().expect("broadcast metadata");
    assert_eq!(meta.master_id, "m1");
    assert!(meta.takes_package_id.is_none());
    assert!(meta.rewrite_id.is_none());
    assert_eq!(meta.status, "");
    assert!(stored.has_genre("Broadcast Script"));
}

#[tokio::test]
async fn test_validation_errors_come_first() {
    let service = create_service().await;

    let err = service
        .create(CreateBroadcast::new("missing"))
        .await
        .expect_err("missing master");
    assert!(matches!(err, BroadcastError::NotFound));

    for (id, item_type, state, expect_type_error) in [
        ("v1", ItemType::Video, ItemState::Draft, true),
        ("k1", ItemType::Text, ItemState::Killed, false),
        ("s1", ItemType::Preformatted, ItemState::Scheduled, false),
    ] {
        let mut item = master(id);
        item.item_type = item_type;
        item.state = state;
        archive::insert(service.store().pool(), item)
            .await
            .expect("insert master");

        let err = service
            .create(CreateBroadcast::new(id))
            .await
            .expect_err("invalid master");
        if expect_type_error {
            assert!(matches!(err, BroadcastError::InvalidType), "{id}: {err}");
        } else {
            assert!(matches!(err, BroadcastError::InvalidState), "{id}: {err}");
        }
        assert!(err.is_user_error());
    }
}

#[tokio::test]
async fn test_publish_reaches_items_of_the_whole_package() {
    let service = create_service().await;
    let mut first = master("t1");
    first.linked_in_packages.push(PackageLink {
        package: "pkg-1".to_string(),
        package_type: Some("takes".to_string()),
    });
    let mut second = master("t2");
    second.linked_in_packages = first.linked_in_packages.clone();

    archive::insert(service.store().pool(), first)
        .await
        .expect("insert take");
    let from_first = service
        .create(CreateBroadcast::new("t1"))
        .await
        .expect("create broadcast");

    let second = archive::insert(service.store().pool(), second)
        .await
        .expect("insert take");
    let from_second = service
        .create(CreateBroadcast::new("t2"))
        .await
        .expect("create broadcast");

    let report = service
        .on_master_event(&MasterEvent::Publish, Some(&second))
        .await;
    assert_eq!(report.updated.len(), 2);
    assert!(report.failed.is_empty());

    for id in [&from_first.id, &from_second.id] {
        let meta = reload(&service, id).await.broadcast.expect("metadata");
        assert_eq!(meta.status, "Master Story Published");
    }
}

#[tokio::test]
async fn test_copied_fields_never_resync() {
    let service = create_service().await;
    let original = archive::insert(service.store().pool(), master("m1"))
        .await
        .expect("insert master");
    let created = service
        .create(CreateBroadcast::new("m1"))
        .await
        .expect("create broadcast");

    let mut changes = serde_json::Map::new();
    changes.insert("urgency".to_string(), json!(5));
    changes.insert("slugline".to_string(), json!("floods-update"));
    let edited = archive::system_update(service.store().pool(), "m1", &changes, &original)
        .await
        .expect("edit master");

    service
        .on_master_event(&MasterEvent::Update, Some(&edited))
        .await;

    let stored = reload(&service, &created.id).await;
    assert_eq!(stored.urgency, Some(2));
    assert_eq!(stored.slugline.as_deref(), Some("floods"));
    assert_eq!(
        stored.broadcast.expect("metadata").status,
        "Master Story Updated"
    );
}

#[tokio::test]
async fn test_rewrite_then_removal() {
    let service = create_service().await;
    let original = archive::insert(service.store().pool(), master("m1"))
        .await
        .expect("insert master");
    let created = service
        .create(CreateBroadcast::new("m1"))
        .await
        .expect("create broadcast");
    let rewrite = archive::insert(service.store().pool(), master("m2"))
        .await
        .expect("insert rewrite");

    let event = MasterEvent::parse("create", None, Some("m2"));
    let report = service.on_master_event(&event, Some(&original)).await;
    assert_eq!(report.updated, vec![created.id.clone()]);

    let meta = reload(&service, &created.id)
        .await
        .broadcast
        .expect("metadata");
    assert_eq!(meta.rewrite_id.as_deref(), Some("m2"));
    assert_eq!(meta.status, "Master story re-written.");

    // A second rewrite never replaces the first reference.
    let event = MasterEvent::parse("create", None, Some("m3"));
    service.on_master_event(&event, Some(&original)).await;
    let meta = reload(&service, &created.id)
        .await
        .broadcast
        .expect("metadata");
    assert_eq!(meta.rewrite_id.as_deref(), Some("m2"));

    let report = service.on_rewrite_removed(&rewrite).await;
    assert_eq!(report.updated, vec![created.id.clone()]);

    let meta = reload(&service, &created.id)
        .await
        .broadcast
        .expect("metadata");
    assert!(meta.rewrite_id.is_none());
    assert_eq!(meta.status, "");
}

#[tokio::test]
async fn test_hooks_ignore_broadcast_items() {
    let service = create_service().await;
    archive::insert(service.store().pool(), master("m1"))
        .await
        .expect("insert master");
    let created = service
        .create(CreateBroadcast::new("m1"))
        .await
        .expect("create broadcast");

    let report = service
        .on_master_event(&MasterEvent::Correct, Some(&created))
        .await;
    assert!(report.is_empty());

    let report = service.on_rewrite_removed(&created).await;
    assert!(report.is_empty());

    assert!(service
        .find_for_master(&created)
        .await
        .expect("find broadcasts")
        .is_empty());
    assert_eq!(reload(&service, &created.id).await.version, 1);
}
