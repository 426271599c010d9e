//! In-memory todo storage backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{StoreResult, Todo, TodoStore};

/// In-memory [`TodoStore`] keyed by user id.
///
/// The map's per-key shard lock serializes concurrent mutations for one
/// user, which is the only atomicity the store contract requires. Data
/// does not survive a process restart.
#[derive(Default)]
pub struct MemoryStore {
    lists: DashMap<String, Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn get(&self, user_id: &str) -> StoreResult<Vec<Todo>> {
        Ok(self
            .lists
            .get(user_id)
            .map(|list| list.clone())
            .unwrap_or_default())
    }

    async fn add(&self, user_id: &str, text: &str) -> StoreResult<Vec<Todo>> {
        let mut list = self.lists.entry(user_id.to_string()).or_default();
        list.push(Todo {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
        });
        Ok(list.clone())
    }

    async fn mark_completed(&self, user_id: &str, id: &str) -> StoreResult<Vec<Todo>> {
        let Some(mut list) = self.lists.get_mut(user_id) else {
            return Ok(Vec::new());
        };
        if let Some(todo) = list.iter_mut().find(|todo| todo.id == id) {
            todo.completed = true;
        }
        Ok(list.clone())
    }

    async fn delete(&self, user_id: &str, id: &str) -> StoreResult<Vec<Todo>> {
        let Some(mut list) = self.lists.get_mut(user_id) else {
            return Ok(Vec::new());
        };
        list.retain(|todo| todo.id != id);
        Ok(list.clone())
    }
}
