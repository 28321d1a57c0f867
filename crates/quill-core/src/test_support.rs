//! In-crate fakes of the ports used by store and hook tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{DEFAULT_CATEGORY, PageRequest, Post, PostId, PostPatch};
use crate::error::{SourceError, StorageError};
use crate::ports::{KeyValueStore, PostMirror, PostSource, RemotePage};
use crate::storage::{POSTS_SLOT, PostStorage};
use crate::store::PostStore;

/// Remote source serving posts `1..=total`.
pub struct FakeSource {
    posts: Vec<Post>,
    failing: Arc<AtomicBool>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(total: u64) -> Self {
        let posts = (1..=total)
            .map(|n| Post {
                id: PostId::Remote(n),
                title: format!("Remote {n}"),
                body: format!("Remote body {n}"),
                user_id: ((n % 10) + 1).to_string(),
                category: DEFAULT_CATEGORY.to_string(),
                image: None,
                created_at: Utc::now(),
                updated_at: None,
            })
            .collect();
        Self {
            posts,
            failing: Arc::new(AtomicBool::new(false)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failure_switch(&self) -> Arc<AtomicBool> {
        self.failing.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostSource for FakeSource {
    async fn fetch_page(&self, page: PageRequest) -> Result<RemotePage, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Transport("connection refused".into()));
        }

        let posts = self
            .posts
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(RemotePage {
            posts,
            total_count: self.posts.len() as u64,
        })
    }
}

#[derive(Default)]
pub struct FakeMirror {
    failing: AtomicBool,
}

impl FakeMirror {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Status(503));
        }
        Ok(())
    }
}

#[async_trait]
impl PostMirror for FakeMirror {
    async fn created(&self, _post: &Post) -> Result<(), SourceError> {
        self.check()
    }

    async fn updated(&self, _id: &PostId, _patch: &PostPatch) -> Result<(), SourceError> {
        self.check()
    }

    async fn deleted(&self, _id: &PostId) -> Result<(), SourceError> {
        self.check()
    }
}

/// Key-value medium that counts writes and can be made to fail.
#[derive(Default)]
pub struct MapStore {
    slots: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
    failing: AtomicBool,
    stall_next: AtomicBool,
}

impl MapStore {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold the next write back for a while before it lands.
    pub fn stall_next_write(&self) {
        self.stall_next.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn saved_posts(&self) -> Vec<Post> {
        let slots = self.slots.try_read().expect("slots not locked in tests");
        slots
            .get(POSTS_SLOT)
            .map(|raw| serde_json::from_str(raw).expect("saved posts are valid json"))
            .unwrap_or_default()
    }
}

#[async_trait]
impl KeyValueStore for MapStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io("disk full".into()));
        }
        if self.stall_next.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

/// Store over `source` with a fresh in-memory medium.
pub fn store_with(source: FakeSource) -> (PostStore, Arc<MapStore>) {
    let medium = Arc::new(MapStore::default());
    let store = PostStore::new(Arc::new(source), PostStorage::new(medium.clone()));
    (store, medium)
}
