//! # Quill Shared
//!
//! Wire types of the blog: form payloads accepted by the server, the view
//! models it renders, the flash toast carried across redirects, and the
//! response envelopes.

pub mod dto;
pub mod flash;
pub mod response;

pub use flash::{Toast, ToastLevel};
pub use response::{ApiResponse, ErrorResponse};
