//! PDF text extractor.
//!
//! Uses pdf-extract for text content. Parsing is CPU-bound, so it runs
//! under `spawn_blocking`.

use async_trait::async_trait;
use docsearch_core::{ExtractError, Extractor};
use tracing::debug;

/// Extractor for PDF uploads.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        debug!("Extracting PDF ({} bytes)", data.len());

        let bytes = data.to_vec();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractError::Parse(format!("task join error: {e}")))?
        .map_err(ExtractError::Parse)?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_extract("pdf"));
        assert!(extractor.can_extract("PDF"));
        assert!(!extractor.can_extract("docx"));
    }

    #[tokio::test]
    async fn test_extract_garbage_fails() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(b"this is not a pdf").await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}
