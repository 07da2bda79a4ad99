//! One interactive search session.

use docsearch_core::{Document, Embedder, ExportError, ScoredResult, SearchError};
use docsearch_embed::CacheStats;
use docsearch_extract::ExtractorRegistry;
use docsearch_query::Ranker;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{CorpusIndex, QueryLedger};

/// A single user session: corpus, ranker (with its private embedding
/// cache), and query ledger, driven by discrete request handlers.
///
/// Each session owns all of its state; concurrent sessions are fully
/// isolated. Dropping the session drops every uploaded document, cached
/// embedding, and ledger entry.
pub struct Session {
    corpus: CorpusIndex,
    ledger: QueryLedger,
    ranker: Ranker,
    extractors: Arc<ExtractorRegistry>,
}

impl Session {
    /// Create a session around an embedding provider, with the standard
    /// upload formats registered.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            corpus: CorpusIndex::new(),
            ledger: QueryLedger::new(),
            ranker: Ranker::new(embedder),
            extractors: Arc::new(ExtractorRegistry::standard()),
        }
    }

    /// Override the per-query result limit.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.ranker = self.ranker.with_top_k(top_k);
        self
    }

    /// Replace the extractor registry.
    #[must_use]
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.extractors = Arc::new(registry);
        self
    }

    /// Handle an upload: extract text and record the document.
    ///
    /// Extraction failures are not fatal; the document is kept with the
    /// error message as its body and simply excluded from ranking.
    pub async fn upload(&mut self, name: &str, data: &[u8]) -> &Document {
        let extracted = self.extractors.extract(name, data).await;
        match &extracted {
            Ok(text) => info!("Uploaded {} ({} chars extracted)", name, text.len()),
            Err(err) => warn!("Extraction failed for {}: {}", name, err),
        }
        self.corpus.add(name, extracted)
    }

    /// Handle a query: rank the corpus and record the outcome.
    ///
    /// Only successful queries are appended to the ledger; precondition
    /// failures and provider errors are reported to the caller and leave
    /// the ledger untouched. No failure here ends the session.
    pub async fn search(&mut self, query: &str) -> Result<Vec<ScoredResult>, SearchError> {
        let documents: Vec<&Document> = self.corpus.searchable().collect();
        let results = self.ranker.rank(query, &documents).await?;
        self.ledger.record(query, &results);
        Ok(results)
    }

    /// Export the query ledger as CSV.
    pub fn export_log(&self) -> Result<Vec<u8>, ExportError> {
        self.ledger.export()
    }

    /// The session corpus.
    #[must_use]
    pub fn corpus(&self) -> &CorpusIndex {
        &self.corpus
    }

    /// The session ledger.
    #[must_use]
    pub fn ledger(&self) -> &QueryLedger {
        &self.ledger
    }

    /// Embedding cache statistics for this session.
    pub async fn cache_stats(&self) -> CacheStats {
        self.ranker.cache().stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_embed::HashEmbedder;

    fn session() -> Session {
        Session::new(Arc::new(HashEmbedder::new()))
    }

    #[tokio::test]
    async fn test_upload_and_search() {
        let mut session = session();
        session.upload("a.txt", b"cats are great").await;
        session.upload("b.txt", b"dogs are great").await;

        let results = session.search("cats").await.unwrap();

        assert_eq!(results[0].name, "a.txt");
        assert_eq!(session.ledger().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_unsupported_format_is_recorded() {
        let mut session = session();
        let doc = session.upload("archive.zip", b"PK\x03\x04").await;

        assert!(!doc.is_searchable());
        assert_eq!(session.corpus().len(), 1);
    }

    #[tokio::test]
    async fn test_search_with_no_documents() {
        let mut session = session();
        let result = session.search("anything").await;

        assert!(matches!(result, Err(SearchError::NoDocuments)));
        assert!(session.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_not_recorded() {
        let mut session = session();
        session.upload("a.txt", b"content").await;

        assert!(session.search("   ").await.is_err());
        assert!(session.ledger().is_empty());

        session.search("content").await.unwrap();
        assert_eq!(session.ledger().len(), 1);
    }

    #[tokio::test]
    async fn test_session_continues_after_failures() {
        let mut session = session();

        // Failed query, failed upload, then a working query
        assert!(session.search("query").await.is_err());
        session.upload("bad.bin", &[0xff]).await;
        session.upload("good.txt", b"useful text").await;

        let results = session.search("useful").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let mut first = session();
        let mut second = session();

        first.upload("only-in-first.txt", b"alpha").await;

        assert_eq!(first.corpus().len(), 1);
        assert!(second.corpus().is_empty());
        assert!(matches!(
            second.search("alpha").await,
            Err(SearchError::NoDocuments)
        ));
    }

    #[tokio::test]
    async fn test_repeat_search_hits_cache() {
        let mut session = session();
        session.upload("a.txt", b"cats are great").await;

        session.search("cats").await.unwrap();
        session.search("cats again").await.unwrap();

        let stats = session.cache_stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_with_top_k() {
        let mut session = session().with_top_k(1);
        session.upload("a.txt", b"shared words").await;
        session.upload("b.txt", b"shared words").await;

        let results = session.search("shared").await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
