//! # Quill Core
//!
//! The domain layer of Quill.
//! Post entities, the ports infrastructure must implement, and the shared
//! post store that every consumer reads from and writes through.

pub mod domain;
pub mod error;
pub mod hook;
pub mod ports;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::{DomainError, PostOperation, SourceError, StorageError, StoreError};
pub use hook::PostsHook;
pub use storage::PostStorage;
pub use store::{PostStore, PostsState};
