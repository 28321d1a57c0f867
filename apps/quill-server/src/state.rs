//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostMirror, PostSource};
use quill_core::{PostStorage, PostStore};
use quill_infra::{FileKeyValueStore, NoopMirror, StaticPostSource};

#[cfg(feature = "http")]
use quill_infra::{HttpPostMirror, HttpPostSource};

use crate::config::PostsConfig;

/// Posts served in offline mode.
const OFFLINE_POST_COUNT: u64 = 100;

/// Shared application state.
///
/// Holds the one post store of the process; every handler reads and writes
/// through it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
    pub page_size: u32,
    pub default_author: String,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &PostsConfig) -> Self {
        let storage = match &config.data_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "Persisting local posts to disk");
                PostStorage::new(Arc::new(FileKeyValueStore::new(dir.clone())))
            }
            None => {
                tracing::warn!("POSTS_DATA_DIR not set. Local posts will not survive a restart.");
                PostStorage::unavailable()
            }
        };

        let store = PostStore::new(build_source(config), storage).with_mirror(build_mirror(config));
        store.restore().await;

        tracing::info!("Application state initialized");

        Self::from_store(Arc::new(store), config)
    }

    pub fn from_store(store: Arc<PostStore>, config: &PostsConfig) -> Self {
        Self {
            store,
            page_size: config.page_size,
            default_author: config.default_author.clone(),
        }
    }
}

#[cfg(feature = "http")]
fn build_source(config: &PostsConfig) -> Arc<dyn PostSource> {
    if config.offline {
        tracing::info!("Offline mode - serving placeholder posts");
        return Arc::new(StaticPostSource::placeholder(OFFLINE_POST_COUNT));
    }
    tracing::info!(url = %config.api_url, "Fetching posts from remote source");
    Arc::new(HttpPostSource::new(config.api_url.clone()))
}

#[cfg(not(feature = "http"))]
fn build_source(_config: &PostsConfig) -> Arc<dyn PostSource> {
    tracing::info!("Running without http feature - serving placeholder posts");
    Arc::new(StaticPostSource::placeholder(OFFLINE_POST_COUNT))
}

#[cfg(feature = "http")]
fn build_mirror(config: &PostsConfig) -> Arc<dyn PostMirror> {
    match &config.mirror_url {
        Some(url) if !config.offline => {
            tracing::info!(url = %url, "Mirroring local writes");
            Arc::new(HttpPostMirror::new(url.clone()))
        }
        _ => Arc::new(NoopMirror),
    }
}

#[cfg(not(feature = "http"))]
fn build_mirror(_config: &PostsConfig) -> Arc<dyn PostMirror> {
    Arc::new(NoopMirror)
}
