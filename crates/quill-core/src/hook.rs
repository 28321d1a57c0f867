//! Consumer hook - a per-consumer view over the shared [`PostStore`].

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{NewPost, PageRequest, Post, PostId, PostPatch};
use crate::error::StoreError;
use crate::store::{PostStore, PostsState};

/// Attaches a consumer to the shared store.
///
/// Attaching fetches the consumer's page once; afterwards reads come from the
/// shared state and writes are delegated to the store unchanged.
pub struct PostsHook {
    store: Arc<PostStore>,
    receiver: watch::Receiver<PostsState>,
    page: PageRequest,
}

impl PostsHook {
    pub async fn attach(store: Arc<PostStore>, page: PageRequest) -> Self {
        let receiver = store.subscribe();
        store.fetch_posts(page).await;
        Self {
            store,
            receiver,
            page,
        }
    }

    /// Switch pagination. Refetches only when the page actually changes.
    pub async fn set_page(&mut self, page: PageRequest) {
        if page == self.page {
            return;
        }
        self.page = page;
        self.store.fetch_posts(page).await;
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn posts(&self) -> Vec<Post> {
        self.receiver.borrow().posts.clone()
    }

    pub fn total_posts(&self) -> u64 {
        self.receiver.borrow().total_posts
    }

    pub fn loading(&self) -> bool {
        self.receiver.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.receiver.borrow().error.clone()
    }

    /// Wait for the next state change. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    pub async fn fetch_posts(&self, page: PageRequest) {
        self.store.fetch_posts(page).await
    }

    pub async fn create_post(&self, input: NewPost) -> Result<Post, StoreError> {
        self.store.create_post(input).await
    }

    pub async fn update_post(&self, id: &PostId, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        self.store.update_post(id, patch).await
    }

    pub async fn delete_post(&self, id: &PostId) -> Result<bool, StoreError> {
        self.store.delete_post(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PostStorage;
    use crate::test_support::FakeSource;

    fn shared(total: u64) -> (Arc<PostStore>, Arc<FakeSource>) {
        let source = Arc::new(FakeSource::new(total));
        let store = Arc::new(PostStore::new(source.clone(), PostStorage::unavailable()));
        (store, source)
    }

    #[tokio::test]
    async fn test_attach_fetches_once() {
        let (store, source) = shared(25);

        let hook = PostsHook::attach(store, PageRequest::default()).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(hook.posts().len(), 10);
        assert_eq!(hook.total_posts(), 25);
        assert!(!hook.loading());
        assert_eq!(hook.error(), None);
    }

    #[tokio::test]
    async fn test_same_page_does_not_refetch() {
        let (store, source) = shared(25);
        let mut hook = PostsHook::attach(store, PageRequest::default()).await;

        hook.set_page(PageRequest::default()).await;
        assert_eq!(source.calls(), 1);

        hook.set_page(PageRequest::new(3, 10).unwrap()).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(hook.posts().len(), 5);
    }

    #[tokio::test]
    async fn test_consumers_share_state() {
        let (store, _) = shared(5);
        let first = PostsHook::attach(store.clone(), PageRequest::default()).await;
        let mut second = PostsHook::attach(store, PageRequest::default()).await;

        let created = first
            .create_post(NewPost::new("Shared", "visible to all", "u1"))
            .await
            .unwrap();

        assert!(second.changed().await);
        assert_eq!(second.posts()[0], created);
        assert_eq!(first.posts(), second.posts());
    }
}
