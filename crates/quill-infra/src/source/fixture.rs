//! Static post source - serves a fixed list, for offline runs.

use async_trait::async_trait;
use chrono::Utc;

use quill_core::SourceError;
use quill_core::domain::{DEFAULT_CATEGORY, PageRequest, Post, PostId};
use quill_core::ports::{PostSource, RemotePage};

/// Serves pages out of an in-memory list. Never fails.
pub struct StaticPostSource {
    posts: Vec<Post>,
}

impl StaticPostSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// `count` placeholder posts with ids `1..=count`, spread over ten authors.
    pub fn placeholder(count: u64) -> Self {
        let now = Utc::now();
        let posts = (1..=count)
            .map(|n| Post {
                id: PostId::Remote(n),
                title: format!("Placeholder post {}", n),
                body: format!("Body of placeholder post {}.", n),
                user_id: ((n - 1) / 10 + 1).to_string(),
                category: DEFAULT_CATEGORY.to_string(),
                image: None,
                created_at: now,
                updated_at: None,
            })
            .collect();
        Self::new(posts)
    }
}

#[async_trait]
impl PostSource for StaticPostSource {
    async fn fetch_page(&self, page: PageRequest) -> Result<RemotePage, SourceError> {
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
