//! Shared helpers for the Office Open XML formats (`docx`, `xlsx`).
//!
//! Both formats are ZIP archives of XML parts. The extractors here only
//! need flat text content, so the parts are scanned for named tags rather
//! than parsed into a document tree.

use docsearch_core::ExtractError;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Open uploaded bytes as a ZIP archive.
pub(crate) fn open_archive(data: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, ExtractError> {
    ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractError::Parse(format!("not a valid archive: {e}")))
}

/// Read one archive entry as a UTF-8 string, `None` if the entry is absent.
pub(crate) fn read_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, ExtractError> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|e| ExtractError::Parse(format!("failed to read {name}: {e}")))?;
            Ok(Some(xml))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(ExtractError::Parse(format!("failed to open {name}: {e}"))),
    }
}

/// Collect the text content of every `<tag>`/`<tag attr=..>` element, in
/// document order. Self-closing elements contribute nothing; entities are
/// decoded.
pub(crate) fn tag_text(xml: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut out = Vec::new();
    let mut rest = xml;

    while let Some(pos) = rest.find(&open) {
        let after = &rest[pos + open.len()..];
        let Some(term) = after.chars().next() else {
            break;
        };
        // A longer tag name sharing this prefix (e.g. <table> vs <t>)
        if term != '>' && term != '/' && !term.is_whitespace() {
            rest = after;
            continue;
        }
        let Some(gt) = after.find('>') else {
            break;
        };
        if after[..gt].ends_with('/') {
            rest = &after[gt + 1..];
            continue;
        }
        let body = &after[gt + 1..];
        let Some(end) = body.find(&close) else {
            break;
        };
        out.push(decode_entities(&body[..end]));
        rest = &body[end + close.len()..];
    }

    out
}

/// Decode the predefined XML entities.
pub(crate) fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
}
