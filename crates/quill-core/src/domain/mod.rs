//! Domain entities - the core business objects.

mod page;
mod post;

pub use page::{DEFAULT_PAGE_SIZE, PageRequest};
pub use post::{DEFAULT_CATEGORY, LOCAL_ID_PREFIX, NewPost, Post, PostId, PostPatch};
