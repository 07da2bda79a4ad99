//! Plain text extractor.

use async_trait::async_trait;
use docsearch_core::{ExtractError, Extractor};

/// Extractor for plain `.txt` uploads.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    async fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        String::from_utf8(data.to_vec()).map_err(|e| ExtractError::Utf8(e.to_string()))
    }
}
