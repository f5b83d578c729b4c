pub mod document_source;
pub mod pdf_extractor;

pub use document_source::fetch_bytes;
pub use pdf_extractor::{extract_pages, extract_text};
