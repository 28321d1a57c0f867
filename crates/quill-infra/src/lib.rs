//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the remote post source, the write mirror and the
//! key-value media behind local persistence.
//!
//! ## Feature Flags
//!
//! - `http` (default) - reqwest-backed post source and mirror
//! - without `http` - static and in-memory adapters only

pub mod kv;
pub mod mirror;
pub mod source;

// Re-exports - Always available
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore};
pub use mirror::NoopMirror;
pub use source::StaticPostSource;

// Re-exports - HTTP
#[cfg(feature = "http")]
pub use mirror::HttpPostMirror;
#[cfg(feature = "http")]
pub use source::HttpPostSource;
