//! PostgreSQL entry store tests for the conditional write.
//!
//! Requires PostgreSQL; skipped unless TEST_DATABASE_URL is set.

mod common;

use common::try_test_pool;
use domain::models::{NewToDoEntry, ToDoStatus};
use domain::services::{EntryStore, StoreError};
use persistence::repositories::ToDoEntryRepository;
use uuid::Uuid;

fn new_entry(title: &str) -> NewToDoEntry {
    NewToDoEntry {
        title: title.to_string(),
        description: "Stored through the repository".to_string(),
        status: ToDoStatus::ToDo,
        pending_approval: None,
        created_by: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn test_replace_from_stale_snapshot_conflicts() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let store = ToDoEntryRepository::new(pool);
    let snapshot = store.create(new_entry("Shared snapshot")).await.unwrap();
    assert_eq!(snapshot.version, 1);

    let mut first = snapshot.clone();
    first.title = "First writer".to_string();
    let updated = store.replace(snapshot.id, &first).await.unwrap();
    assert_eq!(updated.version, 2);

    let mut second = snapshot.clone();
    second.title = "Second writer".to_string();
    let result = store.replace(snapshot.id, &second).await;
    assert!(matches!(result, Err(StoreError::Conflict(id)) if id == snapshot.id));

    let stored = store.get(snapshot.id).await.unwrap();
    assert_eq!(stored.title, "First writer");
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn test_replace_after_delete_is_not_found() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let store = ToDoEntryRepository::new(pool);
    let entry = store.create(new_entry("Short lived")).await.unwrap();

    store.delete(entry.id).await.unwrap();

    let result = store.replace(entry.id, &entry).await;
    assert!(matches!(result, Err(StoreError::NotFound(id)) if id == entry.id));
}

#[tokio::test]
async fn test_replace_keeps_creator_and_bumps_update_time() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let store = ToDoEntryRepository::new(pool);
    let entry = store.create(new_entry("Keep creator")).await.unwrap();

    let mut changed = entry.clone();
    changed.created_by = Uuid::new_v4();
    changed.updated_by = Some(Uuid::new_v4());
    let updated = store.replace(entry.id, &changed).await.unwrap();

    assert_eq!(updated.created_by, entry.created_by);
    assert_eq!(updated.create_time, entry.create_time);
    assert_eq!(updated.updated_by, changed.updated_by);
    assert!(updated.update_time.is_some());
}
