//! # Quill Shared
//!
//! Wire types shared by the Quill server and its clients.

pub mod dto;
pub mod response;

pub use dto::FieldError;
pub use response::{ApiResponse, ErrorResponse};
