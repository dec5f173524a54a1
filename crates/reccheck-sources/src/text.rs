use std::path::Path;

use async_trait::async_trait;
use reccheck_core::{Error, Result};

use crate::handler::{DocumentExtractor, has_extension};

/// Already-extracted text exports (UTF-8)
pub struct TextExtractor;

#[async_trait]
impl DocumentExtractor for TextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::Extraction(format!("Text is not valid UTF-8: {}", e)))?;
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }

    fn can_handle(&self, path: &Path, _bytes: &[u8]) -> bool {
        has_extension(path, &["txt", "text"])
    }
}
