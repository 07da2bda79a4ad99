//! Trait seams for the two external collaborators: text extraction and
//! embedding generation. Both are object-safe so implementations can be
//! swapped behind `Arc<dyn _>` without touching the rest of the system.

use async_trait::async_trait;

use crate::error::{EmbedError, ExtractError};

// ============================================================================
// Text Extraction
// ============================================================================

/// Trait for extracting text from uploaded file bytes.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Lowercase file extensions this extractor handles, without the dot.
    fn supported_extensions(&self) -> &[&str];

    /// Check whether this extractor handles the given extension.
    fn can_extract(&self, extension: &str) -> bool {
        let ext = extension.to_lowercase();
        self.supported_extensions().contains(&ext.as_str())
    }

    /// Extract UTF-8 text from raw file bytes.
    async fn extract(&self, data: &[u8]) -> Result<String, ExtractError>;
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for generating vector embeddings.
///
/// The provider contract: one vector per input string, same order, every
/// vector of length [`dimension`](Embedder::dimension) for the whole
/// process lifetime, cosine-comparable across calls.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query string.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let vectors = self.embed_batch(&[query]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Provider("empty embedding result".to_string()))
    }
}
