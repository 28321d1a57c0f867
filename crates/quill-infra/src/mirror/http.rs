//! HTTP mirror - acknowledges local writes against a `/posts` endpoint.

use async_trait::async_trait;

use quill_core::SourceError;
use quill_core::domain::{Post, PostId, PostPatch};
use quill_core::ports::PostMirror;

pub struct HttpPostMirror {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPostMirror {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn item_url(&self, id: &PostId) -> String {
        format!("{}/posts/{}", self.base_url, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(), SourceError> {
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostMirror for HttpPostMirror {
    async fn created(&self, post: &Post) -> Result<(), SourceError> {
        tracing::debug!(post_id = %post.id, "Mirroring created post");
        self.send(self.client.post(self.collection_url()).json(post))
            .await
    }

    async fn updated(&self, id: &PostId, patch: &PostPatch) -> Result<(), SourceError> {
        tracing::debug!(post_id = %id, "Mirroring post update");
        self.send(self.client.put(self.item_url(id)).json(patch)).await
    }

    async fn deleted(&self, id: &PostId) -> Result<(), SourceError> {
        tracing::debug!(post_id = %id, "Mirroring post deletion");
        self.send(self.client.delete(self.item_url(id))).await
    }
}
