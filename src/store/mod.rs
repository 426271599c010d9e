//! Todo storage abstraction.
//!
//! The service treats persistence as an external collaborator hidden behind
//! the [`TodoStore`] trait, so the REST and MCP facades stay agnostic of the
//! storage backend. Every operation is scoped to a single user and returns
//! the full post-operation list, letting clients reconcile to latest state
//! instead of applying patches.

mod error;
mod memory;
mod models;

#[cfg(test)]
mod memory_test;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::Todo;

use async_trait::async_trait;

/// Per-user todo list storage.
///
/// Implementations must serialize concurrent mutations against the same
/// user so a list is never corrupted by interleaved writes. No ordering is
/// promised beyond insertion order.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Get the user's current todo list.
    async fn get(&self, user_id: &str) -> StoreResult<Vec<Todo>>;

    /// Append a new todo with a generated id and `completed = false`.
    async fn add(&self, user_id: &str, text: &str) -> StoreResult<Vec<Todo>>;

    /// Set `completed = true` on the matching todo. No-op for unknown ids.
    async fn mark_completed(&self, user_id: &str, id: &str) -> StoreResult<Vec<Todo>>;

    /// Remove the matching todo. No-op for unknown ids.
    async fn delete(&self, user_id: &str, id: &str) -> StoreResult<Vec<Todo>>;
}
