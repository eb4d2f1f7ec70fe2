pub mod docx;
pub mod html;

pub use crate::errors::ResultResp;

// Normal HTML response
pub use html::html_response;
pub use docx::docx_response;
