//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod kv;
mod mirror;
mod source;

pub use kv::KeyValueStore;
pub use mirror::{NoopMirror, PostMirror};
pub use source::{PostSource, RemotePage};
