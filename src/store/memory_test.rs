//! Tests for the in-memory todo store.

use super::{MemoryStore, TodoStore};

#[tokio::test]
async fn get_unknown_user_returns_empty_list() {
    let store = MemoryStore::new();
    let todos = store.get("nobody").await.unwrap();
    assert!(todos.is_empty());
}

#[tokio::test]
async fn add_appends_with_generated_id() {
    let store = MemoryStore::new();

    let todos = store.add("user-1", "buy milk").await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].text, "buy milk");
    assert!(!todos[0].completed);
    assert!(!todos[0].id.is_empty());

    let todos = store.add("user-1", "walk dog").await.unwrap();
    assert_eq!(todos.len(), 2);
    assert_ne!(todos[0].id, todos[1].id, "ids must be unique");
    // Insertion order is preserved.
    assert_eq!(todos[0].text, "buy milk");
    assert_eq!(todos[1].text, "walk dog");
}

#[tokio::test]
async fn mark_completed_flips_only_the_matching_todo() {
    let store = MemoryStore::new();
    store.add("user-1", "first").await.unwrap();
    let todos = store.add("user-1", "second").await.unwrap();
    let target = todos[1].id.clone();

    let todos = store.mark_completed("user-1", &target).await.unwrap();
    assert!(!todos[0].completed);
    assert!(todos[1].completed);
    assert_eq!(todos[1].text, "second");
}

#[tokio::test]
async fn mark_completed_unknown_id_is_a_noop() {
    let store = MemoryStore::new();
    let before = store.add("user-1", "only").await.unwrap();

    let after = store.mark_completed("user-1", "missing-id").await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn delete_removes_exactly_the_matching_todo() {
    let store = MemoryStore::new();
    let todos = store.add("user-1", "keep").await.unwrap();
    let keep = todos[0].id.clone();
    let todos = store.add("user-1", "drop").await.unwrap();
    let doomed = todos[1].id.clone();

    let todos = store.delete("user-1", &doomed).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, keep);

    // Repeating the delete is idempotent.
    let again = store.delete("user-1", &doomed).await.unwrap();
    assert_eq!(todos, again);
}

#[tokio::test]
async fn lists_are_partitioned_by_user() {
    let store = MemoryStore::new();
    store.add("alice", "alice's task").await.unwrap();
    store.add("bob", "bob's task").await.unwrap();

    let alice = store.get("alice").await.unwrap();
    let bob = store.get("bob").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(bob.len(), 1);
    assert_eq!(alice[0].text, "alice's task");
    assert_eq!(bob[0].text, "bob's task");

    // Deleting from one list never touches the other.
    store.delete("alice", &alice[0].id).await.unwrap();
    assert_eq!(store.get("bob").await.unwrap().len(), 1);
}
