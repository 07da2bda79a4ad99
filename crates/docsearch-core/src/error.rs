//! Error types for docsearch.

use thiserror::Error;

/// Main error type for docsearch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Text extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Ranking could not run
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Ledger export failed
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Text extraction errors. Per-document and non-fatal: the document is
/// kept in the corpus with the error message as its body.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid utf-8: {0}")]
    Utf8(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Embedding errors. Fatal for the query that hit them, not the session.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// The external provider could not produce vectors for the input.
    #[error("provider failure: {0}")]
    Provider(String),

    /// The provider returned a vector of the wrong length. All embeddings
    /// compared against one another must share one dimension, so this is a
    /// configuration error rather than a bad input.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Ranking precondition failures, reported to the caller as typed results.
#[derive(Error, Debug)]
pub enum SearchError {
    /// No searchable documents in the corpus.
    #[error("no searchable documents in corpus")]
    NoDocuments,

    /// The query is empty or whitespace-only.
    #[error("query is empty or whitespace-only")]
    InvalidQuery,

    /// The provider failed while embedding the corpus or the query.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),
}

/// Ledger export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(String),
}

/// Result type alias for docsearch operations.
pub type Result<T> = std::result::Result<T, Error>;
