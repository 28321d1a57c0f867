//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Remote source and mirror errors.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Unexpected response status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Durable storage errors.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}

/// The store operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOperation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl PostOperation {
    /// Coarse message surfaced through the store's `error` field.
    pub fn failure_message(&self) -> &'static str {
        match self {
            PostOperation::Fetch => "Failed to fetch posts",
            PostOperation::Create => "Failed to create post",
            PostOperation::Update => "Failed to update post",
            PostOperation::Delete => "Failed to delete post",
        }
    }
}

impl fmt::Display for PostOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}

/// Errors returned by post store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{op}")]
    Operation {
        op: PostOperation,
        #[source]
        source: SourceError,
    },
}

impl StoreError {
    pub fn operation(op: PostOperation, source: SourceError) -> Self {
        StoreError::Operation { op, source }
    }
}
