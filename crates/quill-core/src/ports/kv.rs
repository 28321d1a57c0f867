use async_trait::async_trait;

use crate::error::StorageError;

/// Durable key-value slots (file system, browser-like local storage, memory).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` when nothing was ever written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot. Readers observe either the old or the new value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Clear a slot.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
