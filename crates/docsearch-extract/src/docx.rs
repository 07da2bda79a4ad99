//! Word document extractor.
//!
//! A `.docx` file is a ZIP archive; the body text lives in
//! `word/document.xml` as `<w:t>` runs grouped into `<w:p>` paragraphs.

use async_trait::async_trait;
use docsearch_core::{ExtractError, Extractor};
use tracing::debug;

use crate::ooxml;

/// Extractor for Word (`.docx`) uploads.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new Word extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    async fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        debug!("Extracting DOCX ({} bytes)", data.len());

        let bytes = data.to_vec();
        tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
            .await
            .map_err(|e| ExtractError::Parse(format!("task join error: {e}")))?
    }
}

fn extract_docx_text(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ooxml::open_archive(data)?;
    let xml = ooxml::read_entry(&mut archive, "word/document.xml")?
        .ok_or_else(|| ExtractError::Parse("word/document.xml missing".to_string()))?;
    Ok(paragraphs(&xml))
}

/// Join text runs within a paragraph, separate paragraphs with newlines.
fn paragraphs(xml: &str) -> String {
    xml.split("</w:p>")
        .map(|para| ooxml::tag_text(para, "w:t").concat())
        .filter(|para| !para.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
