//! HTTP post source against a JSONPlaceholder-style `/posts` endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use quill_core::SourceError;
use quill_core::domain::{DEFAULT_CATEGORY, PageRequest, Post, PostId};
use quill_core::ports::{PostSource, RemotePage};

/// Response header carrying the total number of posts.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Total assumed when the response has no usable count header.
pub const DEFAULT_TOTAL_COUNT: u64 = 100;

/// Post as served by the remote endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemotePost {
    id: u64,
    user_id: u64,
    title: String,
    body: String,
}

impl RemotePost {
    /// The remote carries no creation time, so the fetch time is used.
    fn into_post(self, fetched_at: DateTime<Utc>) -> Post {
        Post {
            id: PostId::Remote(self.id),
            title: self.title,
            body: self.body,
            user_id: self.user_id.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            image: None,
            created_at: fetched_at,
            updated_at: None,
        }
    }
}

/// Remote source adapter over HTTP.
pub struct HttpPostSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPostSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn page_url(&self, page: PageRequest) -> String {
        format!(
            "{}/posts?_start={}&_limit={}",
            self.base_url,
            page.offset(),
            page.limit()
        )
    }
}

fn total_count(headers: &HeaderMap) -> u64 {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_TOTAL_COUNT)
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch_page(&self, page: PageRequest) -> Result<RemotePage, SourceError> {
        let url = self.page_url(page);
        tracing::debug!(url = %url, "Fetching remote posts");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let total_count = total_count(response.headers());
        let remote: Vec<RemotePost> = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let fetched_at = Utc::now();
        let posts = remote.into_iter().map(|p| p.into_post(fetched_at)).collect();

        Ok(RemotePage { posts, total_count })
    }
}
