use async_trait::async_trait;

use crate::domain::{PageRequest, Post};
use crate::error::SourceError;

/// One page of posts as returned by a remote source, already normalized.
#[derive(Debug, Clone, Default)]
pub struct RemotePage {
    pub posts: Vec<Post>,
    /// Total number of posts the source holds across all pages.
    pub total_count: u64,
}

/// Paginated read access to externally hosted posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch one page. No retries; any failure is returned as-is.
    async fn fetch_page(&self, page: PageRequest) -> Result<RemotePage, SourceError>;
}
