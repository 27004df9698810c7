//! The category registry's view of a category.
//!
//! Categories form a shallow tree (optional parent) and are read-only from
//! the engine's perspective; the registry collaborator owns their lifecycle.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, UserId};

/// A category tickets are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Parent category, if this is a subcategory.
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Users who opted into status-change notifications for tickets filed
    /// under this category. Only consulted when the watcher path is enabled
    /// in [`crate::config::EngineConfig`].
    #[serde(default)]
    pub watchers: Vec<UserId>,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            watchers: Vec::new(),
        }
    }

    /// Builder-style parent assignment.
    #[must_use]
    pub fn with_parent(mut self, parent: CategoryId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Builder-style watcher list.
    #[must_use]
    pub fn with_watchers(mut self, watchers: Vec<UserId>) -> Self {
        self.watchers = watchers;
        self
    }
}
