use std::path::Path;

use async_trait::async_trait;
use reccheck_core::{Error, Result};

use crate::handler::{DocumentExtractor, has_extension};

const PDF_MAGIC: &[u8] = b"%PDF-";

pub struct PdfExtractor;

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(Error::Extraction("Not a PDF document".to_string()));
        }

        // pdf-extract is CPU-bound and synchronous
        let owned = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await
            .map_err(|e| Error::Extraction(format!("PDF extractor aborted: {}", e)))?
            .map_err(|e| Error::Extraction(format!("Failed to extract PDF text: {}", e)))?;

        Ok(text)
    }

    fn can_handle(&self, path: &Path, bytes: &[u8]) -> bool {
        bytes.starts_with(PDF_MAGIC) || has_extension(path, &["pdf"])
    }
}
