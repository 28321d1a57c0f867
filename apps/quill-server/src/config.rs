//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use quill_core::domain::DEFAULT_PAGE_SIZE;

/// Upstream used when `POSTS_API_URL` is not set.
pub const DEFAULT_POSTS_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub posts: PostsConfig,
}

/// Where posts come from and where local ones are kept.
#[derive(Debug, Clone)]
pub struct PostsConfig {
    /// Base URL of the remote post source.
    pub api_url: String,
    /// Base URL that acknowledges local writes. `None` disables mirroring.
    pub mirror_url: Option<String>,
    /// Directory for durable local posts. `None` keeps nothing across restarts.
    pub data_dir: Option<PathBuf>,
    /// Serve bundled placeholder posts instead of calling the remote source.
    pub offline: bool,
    pub page_size: u32,
    /// Author reference for posts created without one.
    pub default_author: String,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_POSTS_API_URL.to_string(),
            mirror_url: None,
            data_dir: None,
            offline: false,
            page_size: DEFAULT_PAGE_SIZE,
            default_author: "1".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            posts: PostsConfig::from_env(),
        }
    }
}

impl PostsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: env::var("POSTS_API_URL").unwrap_or(defaults.api_url),
            mirror_url: non_empty_var("POSTS_MIRROR_URL"),
            data_dir: non_empty_var("POSTS_DATA_DIR").map(PathBuf::from),
            offline: env::var("POSTS_OFFLINE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            page_size: env::var("POSTS_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            default_author: non_empty_var("POSTS_DEFAULT_AUTHOR").unwrap_or(defaults.default_author),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
