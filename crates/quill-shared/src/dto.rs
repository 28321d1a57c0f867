//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MIN_CHARS: usize = 10;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    let len = title.trim().chars().count();
    if len == 0 {
        errors.push(FieldError::new("title", "Title is required"));
    } else if len < TITLE_MIN_CHARS {
        errors.push(FieldError::new("title", "Title must be at least 3 characters"));
    } else if len > TITLE_MAX_CHARS {
        errors.push(FieldError::new("title", "Title must be less than 200 characters"));
    }
}

fn check_category(category: &str, errors: &mut Vec<FieldError>) {
    if category.trim().is_empty() {
        errors.push(FieldError::new("category", "Category is required"));
    }
}

fn check_body(body: &str, errors: &mut Vec<FieldError>) {
    let len = body.trim().chars().count();
    if len == 0 {
        errors.push(FieldError::new("body", "Content is required"));
    } else if len < BODY_MIN_CHARS {
        errors.push(FieldError::new("body", "Content must be at least 10 characters"));
    }
}

/// Request to create a post from the editor form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: String,
    /// Author reference; the server substitutes its default author when absent.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_title(&self.title, &mut errors);
        check_category(&self.category, &mut errors);
        check_body(&self.body, &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to edit a post. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl UpdatePostRequest {
    /// Present fields follow the same rules as creation.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        if let Some(category) = &self.category {
            check_category(category, &mut errors);
        }
        if let Some(body) = &self.body {
            check_body(body, &mut errors);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Pagination query string: `?page=2&limit=10`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Store snapshot returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse<P> {
    pub posts: Vec<P>,
    pub total_posts: u64,
    pub page: u32,
    pub limit: u32,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Card-sized view of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub image: String,
    pub author: String,
    pub created_at: String,
}

/// Landing page sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeFeed {
    pub featured: Vec<PostSummary>,
    pub popular: Vec<PostSummary>,
}
