//! Remote post sources - HTTP and a static offline fallback.

mod fixture;

#[cfg(feature = "http")]
mod http;

pub use fixture::StaticPostSource;

#[cfg(feature = "http")]
pub use http::{DEFAULT_TOTAL_COUNT, HttpPostSource, TOTAL_COUNT_HEADER};
