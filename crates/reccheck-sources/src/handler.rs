//! Text extraction trait and registry

use std::path::Path;

use async_trait::async_trait;
use reccheck_core::{Error, Result};

use crate::pdf::PdfExtractor;
use crate::text::TextExtractor;

/// Plain text pulled out of a source document
#[derive(Debug, Clone)]
pub struct Document {
    pub source_uri: String,
    /// blake3 of the original bytes
    pub content_hash: String,
    pub text: String,
}

/// Turns document bytes into plain text
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Name of the extractor
    fn name(&self) -> &'static str;

    /// Extract text, failing with `Error::Extraction` on corrupt or unsupported input
    async fn extract(&self, bytes: &[u8]) -> Result<String>;

    /// Check if this extractor can handle the given path
    fn can_handle(&self, path: &Path, bytes: &[u8]) -> bool;
}

/// Picks an extractor per document
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(PdfExtractor), Box::new(TextExtractor)],
        }
    }

    /// Read a file and extract its text
    pub async fn load(&self, path: &Path) -> Result<Document> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::Extraction(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.extract(path, &bytes).await
    }

    /// Extract text from bytes already in memory; `path` only guides the choice
    pub async fn extract(&self, path: &Path, bytes: &[u8]) -> Result<Document> {
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.can_handle(path, bytes))
            .ok_or_else(|| {
                Error::Extraction(format!("Unsupported document type: {}", path.display()))
            })?;

        tracing::debug!("Extracting {} with {}", path.display(), extractor.name());
        let text = extractor.extract(bytes).await?;

        Ok(Document {
            source_uri: path.display().to_string(),
            content_hash: blake3::hash(bytes).to_hex().to_string(),
            text,
        })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}
