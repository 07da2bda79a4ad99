//! Core types for docsearch.
//!
//! ## Documents
//! - [`Document`]: an uploaded file and its extraction outcome
//! - [`DocumentBody`]: extracted text, or the stored failure message
//!
//! ## Search
//! - [`ScoredResult`]: a ranked document with its cosine score
//!
//! ## Ledger
//! - [`QueryLogEntry`]: one executed query with its top results
//! - [`RankedName`]: a (name, score) pair inside a ledger entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of results returned per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Number of characters of document text shown as a result preview.
pub const PREVIEW_CHARS: usize = 500;

/// Format a similarity score the way it is displayed and exported.
///
/// Fixed at 4 decimal places so ledger exports are byte-identical for
/// identical ledger state.
#[must_use]
pub fn format_score(score: f32) -> String {
    format!("{score:.4}")
}

// ============================================================================
// Documents
// ============================================================================

/// An uploaded document owned by the session's corpus.
///
/// Duplicate names are allowed; each upload is a distinct document with its
/// own id. Documents live exactly as long as the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: Uuid,
    /// File name as uploaded (not necessarily unique)
    pub name: String,
    /// Extraction outcome
    pub body: DocumentBody,
    /// When the document was added to the corpus
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// The extracted text, if this document can be ranked.
    ///
    /// Empty extractions and failed extractions are both unsearchable.
    #[must_use]
    pub fn searchable_text(&self) -> Option<&str> {
        match &self.body {
            DocumentBody::Text { text } if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Whether this document participates in ranking.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.searchable_text().is_some()
    }
}

/// Extraction outcome stored with a document.
///
/// A failed extraction keeps the error message so the document can still be
/// listed to the user; it is excluded from ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentBody {
    /// Extraction succeeded
    Text { text: String },
    /// Extraction failed; `error` is shown in place of content
    Failed { error: String },
}

// ============================================================================
// Search results
// ============================================================================

/// A ranked document for one query. Recomputed per query, never stored
/// beyond the ledger summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Ranked document id
    pub doc_id: Uuid,
    /// Ranked document name
    pub name: String,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
    /// Leading characters of the document text
    pub preview: String,
}

// ============================================================================
// Query ledger
// ============================================================================

/// A (name, score) pair recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedName {
    pub name: String,
    pub score: f32,
}

/// One executed query in the session ledger. Append-only: entries are
/// created once and never mutated or deleted within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    /// Monotonically increasing sequence number, starting at 1
    pub seq: u64,
    /// The query text as executed
    pub query: String,
    /// Top results in rank order, capped at the ranker's top-k
    pub top_results: Vec<RankedName>,
    /// When the query was recorded
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_doc(name: &str, text: &str) -> Document {
        Document {
            id: Uuid::new_v4(),
            name: name.to_string(),
            body: DocumentBody::Text {
                text: text.to_string(),
            },
            uploaded_at: Utc::now(),
        }
    }

    // ==================== Document Tests ====================

    #[test]
    fn test_document_with_text_is_searchable() {
        let doc = text_doc("notes.txt", "some content");
        assert!(doc.is_searchable());
        assert_eq!(doc.searchable_text(), Some("some content"));
    }

    #[test]
    fn test_document_with_empty_text_is_not_searchable() {
        let doc = text_doc("empty.txt", "");
        assert!(!doc.is_searchable());
        assert!(doc.searchable_text().is_none());
    }

    #[test]
    fn test_failed_document_is_not_searchable() {
        let doc = Document {
            id: Uuid::new_v4(),
            name: "broken.pdf".to_string(),
            body: DocumentBody::Failed {
                error: "parse error: truncated".to_string(),
            },
            uploaded_at: Utc::now(),
        };
        assert!(!doc.is_searchable());
        assert!(doc.searchable_text().is_none());
    }

    #[test]
    fn test_document_serialization() {
        let doc = text_doc("a.txt", "hello");
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(doc.id, back.id);
        assert_eq!(doc.name, back.name);
        assert_eq!(back.searchable_text(), Some("hello"));
    }

    #[test]
    fn test_document_body_tagged_serialization() {
        let body = DocumentBody::Failed {
            error: "unsupported format: exe".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":\"failed\""));

        let body = DocumentBody::Text {
            text: "ok".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":\"text\""));
    }

    // ==================== Score Formatting Tests ====================

    #[test]
    fn test_format_score_four_decimals() {
        assert_eq!(format_score(0.5), "0.5000");
        assert_eq!(format_score(-1.0), "-1.0000");
        assert_eq!(format_score(0.123_456), "0.1235");
    }

    // ==================== Ledger Entry Tests ====================

    #[test]
    fn test_query_log_entry_serialization() {
        let entry = QueryLogEntry {
            seq: 1,
            query: "cats".to_string(),
            top_results: vec![RankedName {
                name: "a.txt".to_string(),
                score: 0.9,
            }],
            recorded_at: Utc::now(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: QueryLogEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(back.seq, 1);
        assert_eq!(back.query, "cats");
        assert_eq!(back.top_results, entry.top_results);
    }
}
