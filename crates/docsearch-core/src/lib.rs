//! # docsearch-core
//!
//! Core types and traits for docsearch, a session-scoped semantic
//! document-search engine.
//!
//! This crate provides the foundational abstractions used throughout
//! docsearch:
//!
//! - **Text Extraction**: [`Extractor`] trait for pulling text out of
//!   uploaded file bytes
//! - **Embedding Generation**: [`Embedder`] trait for converting text to
//!   vector embeddings
//!
//! ## Architecture
//!
//! The workspace is organized as a pipeline around a per-session corpus:
//!
//! ```text
//! Upload → Extractor → Document (CorpusIndex)
//!                          ↓
//! Query  → Embedder → Ranker → ScoredResult → QueryLedger
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | An uploaded file with its extraction outcome |
//! | [`DocumentBody`] | Extracted text or the stored failure message |
//! | [`ScoredResult`] | A ranked document with its similarity score |
//! | [`QueryLogEntry`] | One executed query in the session ledger |
//!
//! ## Related Crates
//!
//! - `docsearch-extract`: per-format extractors and the extension registry
//! - `docsearch-embed`: embedding cache and deterministic embedders
//! - `docsearch-query`: cosine scoring and ranking
//! - `docsearch-session`: corpus index, query ledger, session handlers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EmbedError, Error, ExportError, ExtractError, Result, SearchError};
pub use traits::{Embedder, Extractor};
pub use types::*;
