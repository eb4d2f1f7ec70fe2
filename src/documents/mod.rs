pub mod context;
pub mod docx;
mod placeholders;

pub use context::{CertificateOptions, ContextBuilder};
pub use docx::DocxTemplate;
