//! Integration tests for the todo store
//!
//! These run against a file-backed SQLite database in a temporary
//! directory, the same engine the server uses in production.

use tempfile::TempDir;

use todos::store::TodoStore;
use todos::types::{CreateTodo, TodoPatch};
use todos::Error;

async fn open_store(dir: &TempDir) -> TodoStore {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("todos.db").display());
    let store = TodoStore::connect(&url).await.unwrap();
    store.ensure_schema().await.unwrap();
    store
}

fn create(title: &str) -> CreateTodo {
    CreateTodo {
        title: title.to_string(),
        description: None,
        completed: false,
    }
}

#[tokio::test]
async fn create_echoes_fields_and_assigns_fresh_ids() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let first = store
        .insert(CreateTodo {
            title: "Buy milk".to_string(),
            description: Some("2% if available".to_string()),
            completed: false,
        })
        .await
        .unwrap();

    assert_eq!(first.title, "Buy milk");
    assert_eq!(first.description.as_deref(), Some("2% if available"));
    assert!(!first.completed);

    let second = store.insert(create("Walk the dog")).await.unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn list_returns_every_row_in_id_order() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    assert!(store.list().await.unwrap().is_empty());

    let titles = ["one", "two", "three", "four"];
    for title in titles {
        store.insert(create(title)).await.unwrap();
    }

    let items = store.list().await.unwrap();
    assert_eq!(items.len(), titles.len());

    let listed: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(listed, titles);

    for pair in items.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }
}

#[tokio::test]
async fn update_touches_only_patched_fields() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let item = store
        .insert(CreateTodo {
            title: "Buy milk".to_string(),
            description: Some("2% if available".to_string()),
            completed: false,
        })
        .await
        .unwrap();

    let updated = store
        .update(
            item.id,
            TodoPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, item.id);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.description.as_deref(), Some("2% if available"));
    assert!(updated.completed);

    // The merge is persisted, not just returned
    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![updated]);
}

#[tokio::test]
async fn update_can_clear_description_with_explicit_null() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let item = store
        .insert(CreateTodo {
            title: "Buy milk".to_string(),
            description: Some("2% if available".to_string()),
            completed: false,
        })
        .await
        .unwrap();

    let patch: TodoPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
    let updated = store.update(item.id, patch).await.unwrap();

    assert_eq!(updated.description, None);
    assert_eq!(updated.title, "Buy milk");
}

#[tokio::test]
async fn update_missing_id_fails_without_mutation() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let item = store.insert(create("Buy milk")).await.unwrap();

    let result = store
        .update(
            item.id + 100,
            TodoPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![item]);
}

#[tokio::test]
async fn delete_returns_the_row_and_removes_it() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let item = store.insert(create("Buy milk")).await.unwrap();

    let deleted = store.delete(item.id).await.unwrap();
    assert_eq!(deleted, item);

    assert!(store.list().await.unwrap().is_empty());

    let again = store.delete(item.id).await;
    assert!(matches!(again, Err(Error::NotFound(_))));

    let update = store.update(item.id, TodoPatch::default()).await;
    assert!(matches!(update, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn schema_creation_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let item = store.insert(create("survives")).await.unwrap();

    for _ in 0..3 {
        store.ensure_schema().await.unwrap();
    }

    assert_eq!(store.list().await.unwrap(), vec![item]);
}

#[tokio::test]
async fn concurrent_creates_get_unique_ids() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let inserts = (0..8).map(|i| {
        let store = store.clone();
        async move { store.insert(create(&format!("todo {i}"))).await.unwrap() }
    });

    let items = futures::future::join_all(inserts).await;

    let mut ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    assert_eq!(store.list().await.unwrap().len(), 8);
}
