//! Request and response shapes for the todo resource
//!
//! Three distinct shapes so server-assigned fields never leak into the
//! write paths: the persisted record, the create request, and the
//! update patch.

use serde::{Deserialize, Deserializer, Serialize};

/// A persisted todo row, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoItem {
    /// Store-assigned, immutable once created.
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Body of a Create request. `id` is never accepted from clients.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update: only fields present in the body are applied.
///
/// `description` needs to distinguish "absent" (keep the stored value)
/// from an explicit `null` (clear it), hence the nested `Option`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Merge the patch into an existing record, field by field, touching
    /// only the fields the client actually sent.
    pub fn apply(&self, item: &mut TodoItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Deserializes a field that was present in the body, keeping an inner
/// `None` for an explicit JSON `null`. Absent fields fall back to the
/// outer `None` via `#[serde(default)]`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
