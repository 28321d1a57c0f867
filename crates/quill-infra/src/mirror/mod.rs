//! Write mirrors.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpPostMirror;

pub use quill_core::ports::NoopMirror;
