//! Query ranking.

use docsearch_core::{
    Document, Embedder, ScoredResult, SearchError, DEFAULT_TOP_K, PREVIEW_CHARS,
};
use docsearch_embed::EmbeddingCache;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Ranks searchable documents against a query by cosine similarity.
///
/// Owns the session's embedding cache: repeated queries against an
/// unchanged corpus hit the cache instead of the provider. The query
/// itself is embedded fresh every time.
pub struct Ranker {
    /// Embedding cache wrapping the provider
    cache: EmbeddingCache,
    /// Maximum number of results per query
    top_k: usize,
}

impl Ranker {
    /// Create a new ranker around an embedding provider.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            cache: EmbeddingCache::new(embedder),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the result limit (at least 1).
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// The configured result limit.
    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// The embedding cache, for statistics.
    #[must_use]
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Rank documents against a query.
    ///
    /// Documents without searchable text are skipped. An empty searchable
    /// set reports [`SearchError::NoDocuments`]; a blank query reports
    /// [`SearchError::InvalidQuery`]. Results are sorted by descending
    /// score; the sort is stable, so ties keep upload order and repeated
    /// runs over an unchanged corpus return identical orderings.
    pub async fn rank(
        &self,
        query: &str,
        documents: &[&Document],
    ) -> Result<Vec<ScoredResult>, SearchError> {
        let searchable: Vec<(&Document, &str)> = documents
            .iter()
            .filter_map(|doc| doc.searchable_text().map(|text| (*doc, text)))
            .collect();

        if searchable.is_empty() {
            return Err(SearchError::NoDocuments);
        }
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        debug!("Ranking {} documents against query", searchable.len());

        let pairs: Vec<(Uuid, &str)> = searchable
            .iter()
            .map(|(doc, text)| (doc.id, *text))
            .collect();
        let doc_vectors = self.cache.embed_documents(&pairs).await?;
        let query_vector = self.cache.embed_query(query).await?;

        let mut results: Vec<ScoredResult> = searchable
            .iter()
            .zip(doc_vectors.iter())
            .map(|((doc, text), vector)| ScoredResult {
                doc_id: doc.id,
                name: doc.name.clone(),
                score: crate::cosine_similarity(&query_vector, vector),
                preview: preview(text),
            })
            .collect();

        results
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(self.top_k);

        debug!("Returning {} results", results.len());
        Ok(results)
    }
}

/// Leading characters of the document text, char-boundary safe.
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
