//! Deterministic token-bucket embedder.

use async_trait::async_trait;
use docsearch_core::{EmbedError, Embedder};

/// Default embedding dimension.
const DEFAULT_DIMENSION: usize = 256;

/// Bag-of-words embedder hashing each token into a fixed bucket.
///
/// Tokens are lowercased alphanumeric runs; each token increments the
/// bucket selected by its blake3 hash modulo the dimension. Texts sharing
/// tokens therefore score close under cosine similarity, and the same
/// input always yields the same vector. A stand-in for a real embedding
/// provider, not a semantic model.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a new hash embedder with the default dimension.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_DIMENSION)
    }

    /// Create a new hash embedder with a custom, nonzero dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for token in tokens(text) {
            vector[self.bucket(&token)] += 1.0;
        }
        vector
    }

    fn bucket(&self, token: &str) -> usize {
        let hash = blake3::hash(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        (u64::from_le_bytes(prefix) % self.dimension as u64) as usize
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "token-hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}
