//! Post store - the single owner of the merged post list.
//!
//! Locally authored posts are kept in `local_posts` and persisted through
//! [`PostStorage`]. Remote posts are refetched on demand and always merged
//! *after* the local ones. Every state change is published on a
//! [`watch`] channel so all consumers observe the same state.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, watch};

use crate::domain::{DEFAULT_CATEGORY, LOCAL_ID_PREFIX, NewPost, PageRequest, Post, PostId, PostPatch};
use crate::error::{PostOperation, SourceError, StoreError};
use crate::ports::{NoopMirror, PostMirror, PostSource};
use crate::storage::PostStorage;

/// Placeholder image for local posts, keyed by the id stamp.
const IMAGE_URL_TEMPLATE: &str = "https://picsum.photos/seed/{seed}/600/300";

/// Observable store state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsState {
    /// Local posts followed by the last fetched remote page.
    pub posts: Vec<Post>,
    /// Locally authored posts, newest first.
    pub local_posts: Vec<Post>,
    pub loading: bool,
    /// Coarse message of the last failed operation.
    pub error: Option<String>,
    pub total_posts: u64,
    /// Message of the last failed save, cleared by the next successful one.
    pub persist_error: Option<String>,
}

/// Shared post state container.
pub struct PostStore {
    state: watch::Sender<PostsState>,
    source: Arc<dyn PostSource>,
    mirror: Arc<dyn PostMirror>,
    storage: PostStorage,
    /// Serializes saves so the slot always ends with the newest local list.
    persist_lock: Mutex<()>,
    last_stamp: AtomicI64,
}

impl PostStore {
    pub fn new(source: Arc<dyn PostSource>, storage: PostStorage) -> Self {
        let (state, _) = watch::channel(PostsState::default());
        Self {
            state,
            source,
            mirror: Arc::new(NoopMirror),
            storage,
            persist_lock: Mutex::new(()),
            last_stamp: AtomicI64::new(0),
        }
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn PostMirror>) -> Self {
        self.mirror = mirror;
        self
    }

    /// Reload previously saved local posts. Returns how many were restored.
    pub async fn restore(&self) -> usize {
        let saved = self.storage.load().await;
        let count = saved.len();

        if let Some(max) = saved.iter().filter_map(|p| local_stamp(&p.id)).max() {
            self.last_stamp.fetch_max(max, Ordering::SeqCst);
        }

        self.state.send_modify(|s| {
            let remote: Vec<Post> = s.posts.iter().filter(|p| !p.id.is_local()).cloned().collect();
            s.posts = merge(&saved, remote);
            s.local_posts = saved;
        });

        tracing::info!(count, "Restored local posts");
        count
    }

    /// Receive every future state change.
    pub fn subscribe(&self) -> watch::Receiver<PostsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PostsState {
        self.state.borrow().clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state.borrow().posts.clone()
    }

    pub fn local_posts(&self) -> Vec<Post> {
        self.state.borrow().local_posts.clone()
    }

    pub fn find(&self, id: &PostId) -> Option<Post> {
        self.state.borrow().posts.iter().find(|p| &p.id == id).cloned()
    }

    /// Fetch a remote page and merge it behind the local posts.
    ///
    /// Failures only land in `error`; the current posts stay available.
    pub async fn fetch_posts(&self, page: PageRequest) {
        self.begin();

        match self.source.fetch_page(page).await {
            Ok(remote) => {
                let fetched = remote.posts.len();
                self.state.send_modify(|s| {
                    s.posts = merge(&s.local_posts, remote.posts);
                    s.total_posts = remote.total_count;
                    s.loading = false;
                });
                tracing::debug!(
                    page = page.page(),
                    limit = page.limit(),
                    fetched,
                    total = remote.total_count,
                    "Fetched posts"
                );
            }
            Err(e) => {
                tracing::error!(page = page.page(), limit = page.limit(), error = %e, "Failed to fetch posts");
                self.fail(PostOperation::Fetch);
            }
        }
    }

    /// Create a local post and persist the local list.
    pub async fn create_post(&self, input: NewPost) -> Result<Post, StoreError> {
        require_text("title", &input.title)?;
        require_text("body", &input.body)?;

        self.begin();

        let stamp = self.unused_stamp();
        let post = Post {
            id: PostId::local(stamp),
            title: input.title,
            body: input.body,
            user_id: input.user_id,
            category: input
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image: Some(IMAGE_URL_TEMPLATE.replace("{seed}", &stamp.to_string())),
            created_at: Utc::now(),
            updated_at: None,
        };

        if let Err(e) = self.mirror.created(&post).await {
            return Err(self.abort(PostOperation::Create, e));
        }

        self.state.send_modify(|s| {
            s.local_posts.insert(0, post.clone());
            s.posts.insert(0, post.clone());
            s.loading = false;
        });
        tracing::info!(post_id = %post.id, "Post created");

        self.persist().await;
        Ok(post)
    }

    /// Merge `patch` into the post with `id`.
    ///
    /// Returns the updated post, or `None` when no post has that id (state is
    /// left untouched and no error is recorded).
    pub async fn update_post(&self, id: &PostId, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        if let Some(body) = &patch.body {
            require_text("body", body)?;
        }

        self.begin();

        if let Err(e) = self.mirror.updated(id, &patch).await {
            return Err(self.abort(PostOperation::Update, e));
        }

        let now = Utc::now();
        let mut updated = None;
        let mut local_changed = false;
        self.state.send_modify(|s| {
            for post in s.posts.iter_mut().filter(|p| &p.id == id) {
                patch.apply_to(post, now);
                updated = Some(post.clone());
            }

            for post in s.local_posts.iter_mut().filter(|p| &p.id == id) {
                patch.apply_to(post, now);
                local_changed = true;
                if updated.is_none() {
                    updated = Some(post.clone());
                }
            }
            s.loading = false;
        });

        match &updated {
            Some(_) => tracing::info!(post_id = %id, "Post updated"),
            None => tracing::debug!(post_id = %id, "Update matched no post"),
        }

        if local_changed {
            self.persist().await;
        }
        Ok(updated)
    }

    /// Remove the post with `id`. Returns whether anything was removed.
    pub async fn delete_post(&self, id: &PostId) -> Result<bool, StoreError> {
        self.begin();

        if let Err(e) = self.mirror.deleted(id).await {
            return Err(self.abort(PostOperation::Delete, e));
        }

        let mut removed = false;
        let mut local_changed = false;
        self.state.send_modify(|s| {
            let before = s.posts.len();
            s.posts.retain(|p| &p.id != id);
            removed = s.posts.len() != before;

            let before = s.local_posts.len();
            s.local_posts.retain(|p| &p.id != id);
            if s.local_posts.len() != before {
                removed = true;
                local_changed = true;
            }

            s.loading = false;
        });

        if removed {
            tracing::info!(post_id = %id, "Post deleted");
        } else {
            tracing::debug!(post_id = %id, "Delete matched no post");
        }

        if local_changed {
            self.persist().await;
        }
        Ok(removed)
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn fail(&self, op: PostOperation) {
        self.state.send_modify(|s| {
            s.error = Some(op.failure_message().to_string());
            s.loading = false;
        });
    }

    fn abort(&self, op: PostOperation, source: SourceError) -> StoreError {
        tracing::error!(operation = ?op, error = %source, "{}", op.failure_message());
        self.fail(op);
        StoreError::operation(op, source)
    }

    /// Save the current local list. The list is read under the lock, so a
    /// save that finishes last never carries an older list.
    async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let local = self.state.borrow().local_posts.clone();
        let outcome = self.storage.save(&local).await;
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Failed to persist local posts");
        }

        let next = outcome.err().map(|e| e.to_string());
        self.state.send_if_modified(|s| {
            if s.persist_error == next {
                return false;
            }
            s.persist_error = next;
            true
        });
    }

    /// Next strictly increasing stamp that no current post id uses.
    fn unused_stamp(&self) -> i64 {
        loop {
            let stamp = self.next_stamp();
            let id = PostId::local(stamp);
            if !self.state.borrow().posts.iter().any(|p| p.id == id) {
                return stamp;
            }
        }
    }

    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last_stamp.load(Ordering::SeqCst);
        loop {
            let next = now.max(prev + 1);
            match self
                .last_stamp
                .compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn local_stamp(id: &PostId) -> Option<i64> {
    match id {
        PostId::Local(token) => token.strip_prefix(LOCAL_ID_PREFIX)?.parse().ok(),
        PostId::Remote(_) => None,
    }
}

/// Local posts first, then remote ones whose id is not already present.
fn merge(local: &[Post], remote: Vec<Post>) -> Vec<Post> {
    let mut seen: HashSet<PostId> = local.iter().map(|p| p.id.clone()).collect();
    let mut merged = local.to_vec();
    merged.extend(remote.into_iter().filter(|p| seen.insert(p.id.clone())));
    merged
}
