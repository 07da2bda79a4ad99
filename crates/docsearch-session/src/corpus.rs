//! The session's document corpus.

use chrono::Utc;
use docsearch_core::{Document, DocumentBody, ExtractError};
use uuid::Uuid;

/// Uploaded documents for one session, in upload order.
///
/// Upload order is load-bearing: ranking breaks score ties by it.
/// Duplicate names are kept as distinct documents, mirroring multi-file
/// upload semantics where the same filename may appear twice.
#[derive(Default)]
pub struct CorpusIndex {
    documents: Vec<Document>,
}

impl CorpusIndex {
    /// Create an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upload. A failed extraction is kept with its error
    /// message as the document body so it can still be listed.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        extracted: Result<String, ExtractError>,
    ) -> &Document {
        let body = match extracted {
            Ok(text) => DocumentBody::Text { text },
            Err(err) => DocumentBody::Failed {
                error: err.to_string(),
            },
        };
        self.documents.push(Document {
            id: Uuid::new_v4(),
            name: name.into(),
            body,
            uploaded_at: Utc::now(),
        });
        self.documents.last().expect("document was just pushed")
    }

    /// Documents that participate in ranking: extraction succeeded and
    /// the text is non-empty. Recomputed on every call.
    pub fn searchable(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|doc| doc.is_searchable())
    }

    /// All documents, in upload order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Look up a document by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Total number of documents, searchable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus has no documents at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
