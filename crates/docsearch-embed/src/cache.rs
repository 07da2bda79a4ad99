//! Embedding cache for avoiding redundant provider calls.
//!
//! Document embeddings are cached by document identity plus a content
//! hash, so repeated queries against an unchanged corpus never re-embed.
//! Query embeddings always go to the provider: queries are one-off.

use docsearch_core::{EmbedError, Embedder};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Maximum number of entries in the cache.
const DEFAULT_CACHE_SIZE: usize = 10_000;

/// A cached embedding entry.
#[derive(Clone)]
struct CacheEntry {
    vector: Vec<f32>,
    /// Access counter for oldest-first eviction
    access_count: u64,
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries evicted
    pub evictions: u64,
}

/// Embedding cache wrapping the session's provider.
///
/// Every vector returned by the provider is checked against the declared
/// dimension; a mismatch is [`EmbedError::DimensionMismatch`] since mixing
/// dimensions would poison every comparison downstream.
pub struct EmbeddingCache {
    /// The underlying provider
    embedder: Arc<dyn Embedder>,
    /// Cache map: document id + content hash -> vector
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Maximum cache size
    max_entries: usize,
    /// Global access counter
    access_counter: RwLock<u64>,
    /// Cache statistics
    stats: RwLock<CacheStats>,
}

impl EmbeddingCache {
    /// Create a new embedding cache with default capacity.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_capacity(embedder, DEFAULT_CACHE_SIZE)
    }

    /// Create a new embedding cache with the given capacity.
    pub fn with_capacity(embedder: Arc<dyn Embedder>, max_entries: usize) -> Self {
        Self {
            embedder,
            entries: RwLock::new(HashMap::new()),
            max_entries,
            access_counter: RwLock::new(0),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Cache key: document identity plus content hash, so a document whose
    /// text changed misses even under the same id.
    fn cache_key(doc_id: Uuid, text: &str) -> String {
        format!(
            "{}:{}",
            doc_id.as_simple(),
            blake3::hash(text.as_bytes()).to_hex()
        )
    }

    async fn next_access(&self) -> u64 {
        let mut counter = self.access_counter.write().await;
        *counter += 1;
        *counter
    }

    /// Evict the oldest tenth of entries once the cache is full.
    async fn maybe_evict(&self) {
        let mut entries = self.entries.write().await;

        if entries.len() < self.max_entries {
            return;
        }

        let evict_count = (self.max_entries / 10).max(1);
        let mut by_age: Vec<_> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.access_count))
            .collect();
        by_age.sort_by_key(|(_, count)| *count);

        let mut stats = self.stats.write().await;
        for (key, _) in by_age.into_iter().take(evict_count) {
            entries.remove(&key);
            stats.evictions += 1;
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), EmbedError> {
        let expected = self.embedder.dimension();
        if vector.len() != expected {
            return Err(EmbedError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Embed documents, serving unchanged ones from the cache.
    ///
    /// Returns one vector per input pair, in input order.
    pub async fn embed_documents(
        &self,
        docs: &[(Uuid, &str)],
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(docs.len());
        let mut uncached_texts = Vec::new();
        let mut uncached_indices = Vec::new();

        {
            let entries = self.entries.read().await;
            let mut stats = self.stats.write().await;

            for (i, (doc_id, text)) in docs.iter().enumerate() {
                let key = Self::cache_key(*doc_id, text);
                if let Some(entry) = entries.get(&key) {
                    stats.hits += 1;
                    results.push(Some(entry.vector.clone()));
                } else {
                    stats.misses += 1;
                    uncached_texts.push(*text);
                    uncached_indices.push(i);
                    results.push(None);
                }
            }
        }

        if !uncached_texts.is_empty() {
            debug!(
                "Cache miss for {} of {} documents, embedding",
                uncached_texts.len(),
                docs.len()
            );

            let vectors = self.embedder.embed_batch(&uncached_texts).await?;
            if vectors.len() != uncached_texts.len() {
                return Err(EmbedError::Provider(format!(
                    "provider returned {} vectors for {} inputs",
                    vectors.len(),
                    uncached_texts.len()
                )));
            }
            for vector in &vectors {
                self.check_dimension(vector)?;
            }

            self.maybe_evict().await;

            let mut entries = self.entries.write().await;
            for (&idx, vector) in uncached_indices.iter().zip(vectors.iter()) {
                let (doc_id, text) = docs[idx];
                let access = self.next_access().await;
                entries.insert(
                    Self::cache_key(doc_id, text),
                    CacheEntry {
                        vector: vector.clone(),
                        access_count: access,
                    },
                );
            }
            drop(entries);

            for (idx, vector) in uncached_indices.into_iter().zip(vectors) {
                results[idx] = Some(vector);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    /// Embed a query. Never cached.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let vector = self.embedder.embed_query(query).await?;
        self.check_dimension(&vector)?;
        Ok(vector)
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    /// Get the number of cached entries.
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Clear the cache.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Get the embedding dimension.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    /// Get the provider's model name.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}
