use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix marking ids generated on this side rather than by the remote source.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Category assigned to posts that arrive without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Identifier of a post.
///
/// Remote posts carry the numeric id of the upstream source, locally authored
/// posts carry a `local-` prefixed token. On the wire both are written as-is
/// (JSON number or JSON string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Remote(u64),
    Local(String),
}

impl PostId {
    /// Build a local id from a stamp (unix milliseconds).
    pub fn local(stamp: i64) -> Self {
        PostId::Local(format!("{LOCAL_ID_PREFIX}{stamp}"))
    }

    /// Parse an id coming from a URL path or form field.
    ///
    /// An all-digit value is a remote id, anything else is kept verbatim as a
    /// local id.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(n) => PostId::Remote(n),
            Err(_) => PostId::Local(raw.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, PostId::Local(_))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Remote(n) => write!(f, "{}", n),
            PostId::Local(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PostId {
    fn from(n: u64) -> Self {
        PostId::Remote(n)
    }
}

/// Post entity - a blog article, either fetched or locally authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    /// Opaque author reference.
    pub user_id: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Post {
    /// Plain-text preview: markup tags removed, cut to `max_chars` characters.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut text = String::with_capacity(self.body.len().min(max_chars * 4));
        let mut in_tag = false;
        for c in self.body.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }

        let text = text.trim();
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => text[..cut].trim_end().to_string(),
            None => text.to_string(),
        }
    }
}

/// Input for creating a post. Id, image and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            user_id: user_id.into(),
            category: None,
        }
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl PostPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.user_id.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }

    /// Merge the patch into `post` and stamp `updated_at`.
    pub fn apply_to(&self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(body) = &self.body {
            post.body = body.clone();
        }
        if let Some(user_id) = &self.user_id {
            post.user_id = user_id.clone();
        }
        if let Some(category) = &self.category {
            post.category = category.clone();
        }
        if let Some(image) = &self.image {
            post.image = Some(image.clone());
        }
        post.updated_at = Some(now);
    }
}
