use async_trait::async_trait;

use crate::domain::{Post, PostId, PostPatch};
use crate::error::SourceError;

/// Acknowledges local writes against an external endpoint.
///
/// Responses are never read back into store state; a failure only aborts the
/// write that triggered it.
#[async_trait]
pub trait PostMirror: Send + Sync {
    async fn created(&self, post: &Post) -> Result<(), SourceError>;

    async fn updated(&self, id: &PostId, patch: &PostPatch) -> Result<(), SourceError>;

    async fn deleted(&self, id: &PostId) -> Result<(), SourceError>;
}

/// Mirror that accepts every write without contacting anything.
pub struct NoopMirror;

#[async_trait]
impl PostMirror for NoopMirror {
    async fn created(&self, _post: &Post) -> Result<(), SourceError> {
        Ok(())
    }

    async fn updated(&self, _id: &PostId, _patch: &PostPatch) -> Result<(), SourceError> {
        Ok(())
    }

    async fn deleted(&self, _id: &PostId) -> Result<(), SourceError> {
        Ok(())
    }
}
