//! Domain entities.

use serde::{Deserialize, Serialize};

/// A single todo item.
///
/// Identity is `id`, unique within one user's list. The only mutation after
/// creation is flipping `completed`; everything else is create/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-generated opaque identifier (UUID v4).
    pub id: String,
    /// Display text of the task.
    pub text: String,
    /// Whether the task has been completed.
    pub completed: bool,
}
