pub mod handler;
pub mod pdf;
pub mod text;

pub use handler::{Document, DocumentExtractor, ExtractorRegistry};
