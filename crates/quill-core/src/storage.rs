//! Persistence adapter - keeps the locally authored post list in one durable slot.

use std::sync::Arc;

use crate::domain::Post;
use crate::error::StorageError;
use crate::ports::KeyValueStore;

/// Slot holding the JSON-serialized list of local posts.
pub const POSTS_SLOT: &str = "quill.local-posts";

/// Reads and writes the full local post list.
///
/// Without a backing medium every load is empty and every save is a no-op.
#[derive(Clone)]
pub struct PostStorage {
    medium: Option<Arc<dyn KeyValueStore>>,
    key: String,
}

impl PostStorage {
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self {
            medium: Some(medium),
            key: POSTS_SLOT.to_string(),
        }
    }

    /// Storage for contexts with no durable medium.
    pub fn unavailable() -> Self {
        Self {
            medium: None,
            key: POSTS_SLOT.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.medium.is_some()
    }

    /// Previously saved posts. Missing, unreadable or malformed slots load as empty.
    pub async fn load(&self) -> Vec<Post> {
        let Some(medium) = &self.medium else {
            return Vec::new();
        };

        let raw = match medium.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read saved posts");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Post>>(&raw) {
            Ok(posts) => {
                tracing::debug!(key = %self.key, count = posts.len(), "Loaded saved posts");
                posts
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding malformed saved posts");
                Vec::new()
            }
        }
    }

    /// Serialize the full list and overwrite the slot.
    pub async fn save(&self, posts: &[Post]) -> Result<(), StorageError> {
        let Some(medium) = &self.medium else {
            return Ok(());
        };

        let raw =
            serde_json::to_string(posts).map_err(|e| StorageError::Serialization(e.to_string()))?;
        medium.set(&self.key, &raw).await?;

        tracing::debug!(key = %self.key, count = posts.len(), "Saved posts");
        Ok(())
    }
}
