//! Key-value storage implementations - file-backed and in-memory fallback.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
