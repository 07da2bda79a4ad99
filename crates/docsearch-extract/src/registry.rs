//! Extractor registry, keyed by file extension.

use docsearch_core::{ExtractError, Extractor};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Registry of text extractors.
///
/// Dispatches on the uploaded file's extension (lowercased). Unknown
/// extensions yield [`ExtractError::UnsupportedFormat`]; the caller is
/// expected to record the document anyway with the failure as its body.
pub struct ExtractorRegistry {
    /// Named extractors
    extractors: HashMap<String, Arc<dyn Extractor>>,
    /// Extension to extractor name mapping
    extension_mapping: HashMap<String, String>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            extension_mapping: HashMap::new(),
        }
    }

    /// Create a registry with the standard upload formats registered:
    /// `txt`, `pdf`, `docx`, `xlsx`.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("text", crate::PlainTextExtractor::new());
        registry.register("pdf", crate::PdfExtractor::new());
        registry.register("docx", crate::DocxExtractor::new());
        registry.register("xlsx", crate::XlsxExtractor::new());
        registry
    }

    /// Register an extractor under a name.
    pub fn register<E: Extractor + 'static>(&mut self, name: &str, extractor: E) {
        let extractor = Arc::new(extractor);
        for ext in extractor.supported_extensions() {
            self.extension_mapping
                .insert((*ext).to_string(), name.to_string());
        }
        self.extractors.insert(name.to_string(), extractor);
    }

    /// Get the extractor for an extension, if one is registered.
    #[must_use]
    pub fn get_for_extension(&self, extension: &str) -> Option<Arc<dyn Extractor>> {
        self.extension_mapping
            .get(&extension.to_lowercase())
            .and_then(|name| self.extractors.get(name))
            .cloned()
    }

    /// Extract text from an uploaded file, dispatching on its extension.
    pub async fn extract(&self, file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let extractor = self.get_for_extension(&extension).ok_or_else(|| {
            ExtractError::UnsupportedFormat(if extension.is_empty() {
                file_name.to_string()
            } else {
                extension.clone()
            })
        })?;

        debug!("Extracting {} via .{} extractor", file_name, extension);
        extractor.extract(data).await
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
