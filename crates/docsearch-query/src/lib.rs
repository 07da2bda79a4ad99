//! # docsearch-query
//!
//! The ranking core: [`cosine_similarity`] scoring and the [`Ranker`],
//! which turns a query string and the session corpus into an ordered
//! top-k result list. Document embeddings flow through the session's
//! private [`EmbeddingCache`](docsearch_embed::EmbeddingCache); ranking
//! has no other side effects.

mod ranker;
mod similarity;

pub use ranker::Ranker;
pub use similarity::cosine_similarity;
