//! # docsearch-extract
//!
//! Text extractors for the upload formats docsearch recognizes:
//!
//! | Extension | Extractor | Approach |
//! |-----------|-----------|----------|
//! | `txt` | [`PlainTextExtractor`] | UTF-8 decode |
//! | `pdf` | [`PdfExtractor`] | `pdf-extract`, run off the async runtime |
//! | `docx` | [`DocxExtractor`] | ZIP archive, WordprocessingML text runs |
//! | `xlsx` | [`XlsxExtractor`] | ZIP archive, shared strings + cell values |
//!
//! [`ExtractorRegistry`] dispatches on the uploaded file's extension; any
//! other extension is an [`ExtractError::UnsupportedFormat`], which callers
//! record against the document without failing the session.
//!
//! [`ExtractError::UnsupportedFormat`]: docsearch_core::ExtractError::UnsupportedFormat

mod docx;
mod ooxml;
mod pdf;
mod registry;
mod text;
mod xlsx;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::PlainTextExtractor;
pub use xlsx::XlsxExtractor;
