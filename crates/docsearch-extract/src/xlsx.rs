//! Excel workbook extractor.
//!
//! An `.xlsx` file is a ZIP archive. String cells reference the shared
//! string table (`xl/sharedStrings.xml`); sheet cells live in
//! `xl/worksheets/*.xml`. Cells within a row are joined with spaces and
//! rows with newlines, so workbook content reads like lines of text.

use async_trait::async_trait;
use docsearch_core::{ExtractError, Extractor};
use tracing::debug;

use crate::ooxml;

/// Extractor for Excel (`.xlsx`) uploads.
pub struct XlsxExtractor;

impl XlsxExtractor {
    /// Create a new Excel extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for XlsxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for XlsxExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["xlsx"]
    }

    async fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        debug!("Extracting XLSX ({} bytes)", data.len());

        let bytes = data.to_vec();
        tokio::task::spawn_blocking(move || extract_xlsx_text(&bytes))
            .await
            .map_err(|e| ExtractError::Parse(format!("task join error: {e}")))?
    }
}

fn extract_xlsx_text(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ooxml::open_archive(data)?;

    let shared = match ooxml::read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => shared_strings(&xml),
        None => Vec::new(),
    };

    // Sorted for a deterministic sheet order
    let mut sheet_parts: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("xl/worksheets/") && name.ends_with(".xml"))
        .map(String::from)
        .collect();
    sheet_parts.sort();

    let mut sheets = Vec::new();
    for part in sheet_parts {
        if let Some(xml) = ooxml::read_entry(&mut archive, &part)? {
            let text = sheet_text(&xml, &shared);
            if !text.is_empty() {
                sheets.push(text);
            }
        }
    }

    Ok(sheets.join("\n"))
}

/// Shared string table in index order. Rich-text items concatenate their
/// `<t>` runs.
fn shared_strings(xml: &str) -> Vec<String> {
    xml.split("</si>")
        .map(|item| ooxml::tag_text(item, "t").concat())
        .collect()
}

fn sheet_text(xml: &str, shared: &[String]) -> String {
    let mut rows = Vec::new();
    for row in xml.split("</row>") {
        let cells = row_cells(row, shared);
        if !cells.is_empty() {
            rows.push(cells.join(" "));
        }
    }
    rows.join("\n")
}

/// Cell values in one row. Shared-string cells (`t="s"`) resolve their
/// `<v>` index against the table; inline strings keep their own `<t>`
/// runs; everything else uses the raw `<v>` value.
fn row_cells(row_xml: &str, shared: &[String]) -> Vec<String> {
    let mut cells = Vec::new();
    let mut rest = row_xml;

    while let Some(pos) = find_cell(rest) {
        let after = &rest[pos..];
        let Some(gt) = after.find('>') else {
            break;
        };
        if after[..gt].ends_with('/') {
            rest = &after[gt + 1..];
            continue;
        }
        let head = &after[..gt];
        let beyond = &after[gt + 1..];
        let Some(end) = beyond.find("</c>") else {
            break;
        };
        let body = &beyond[..end];

        let value = if head.contains("t=\"s\"") {
            ooxml::tag_text(body, "v")
                .first()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .and_then(|idx| shared.get(idx))
                .cloned()
        } else if head.contains("t=\"inlineStr\"") {
            Some(ooxml::tag_text(body, "t").concat())
        } else {
            ooxml::tag_text(body, "v").into_iter().next()
        };

        if let Some(value) = value {
            if !value.is_empty() {
                cells.push(value);
            }
        }
        rest = &beyond[end + "</c>".len()..];
    }

    cells
}

/// Locate the next `<c>` cell tag, skipping `<col>`/`<cols>`.
fn find_cell(xml: &str) -> Option<usize> {
    let bytes = xml.as_bytes();
    let mut from = 0;
    while let Some(offset) = xml[from..].find("<c") {
        let idx = from + offset;
        match bytes.get(idx + 2) {
            Some(b' ') | Some(b'>') | Some(b'/') => return Some(idx),
            _ => from = idx + 2,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::testutil::archive;

    const SHARED: &str = "<sst count=\"2\" uniqueCount=\"2\">\
        <si><t>alpha</t></si>\
        <si><r><t>beta </t></r><r><t>gamma</t></r></si>\
        </sst>";

    #[tokio::test]
    async fn test_extract_shared_and_numeric_cells() {
        let sheet = "<worksheet><sheetData>\
            <row r=\"1\"><c r=\"A1\" t=\"s\"><v>0</v></c><c r=\"B1\"><v>42</v></c></row>\
            <row r=\"2\"><c r=\"A2\" t=\"s\"><v>1</v></c></row>\
            </sheetData></worksheet>";
        let data = archive(&[
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);

        let extractor = XlsxExtractor::new();
        let text = extractor.extract(&data).await.unwrap();
        assert_eq!(text, "alpha 42\nbeta gamma");
    }

    #[tokio::test]
    async fn test_extract_inline_string_cells() {
        let sheet = "<worksheet><sheetData>\
            <row r=\"1\"><c r=\"A1\" t=\"inlineStr\"><is><t>inline value</t></is></c></row>\
            </sheetData></worksheet>";
        let data = archive(&[("xl/worksheets/sheet1.xml", sheet)]);

        let extractor = XlsxExtractor::new();
        let text = extractor.extract(&data).await.unwrap();
        assert_eq!(text, "inline value");
    }

    #[tokio::test]
    async fn test_extract_multiple_sheets_in_order() {
        let sheet1 = "<worksheet><sheetData>\
            <row><c><v>first</v></c></row></sheetData></worksheet>";
        let sheet2 = "<worksheet><sheetData>\
            <row><c><v>second</v></c></row></sheetData></worksheet>";
        let data = archive(&[
            ("xl/worksheets/sheet2.xml", sheet2),
            ("xl/worksheets/sheet1.xml", sheet1),
        ]);

        let extractor = XlsxExtractor::new();
        let text = extractor.extract(&data).await.unwrap();
        assert_eq!(text, "first\nsecond");
    }

    #[tokio::test]
    async fn test_extract_skips_empty_cells() {
        let sheet = "<worksheet><sheetData>\
            <row r=\"1\"><c r=\"A1\"/><c r=\"B1\"><v>kept</v></c></row>\
            <row r=\"2\"></row>\
            </sheetData></worksheet>";
        let data = archive(&[("xl/worksheets/sheet1.xml", sheet)]);

        let extractor = XlsxExtractor::new();
        let text = extractor.extract(&data).await.unwrap();
        assert_eq!(text, "kept");
    }

    #[tokio::test]
    async fn test_extract_out_of_range_shared_index_is_dropped() {
        let sheet = "<worksheet><sheetData>\
            <row><c t=\"s\"><v>99</v></c><c><v>ok</v></c></row>\
            </sheetData></worksheet>";
        let data = archive(&[
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);

        let extractor = XlsxExtractor::new();
        let text = extractor.extract(&data).await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_extract_not_a_zip_fails() {
        let extractor = XlsxExtractor::new();
        let result = extractor.extract(b"nope").await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_find_cell_skips_cols() {
        let xml = "<cols><col min=\"1\" max=\"1\"/></cols><c r=\"A1\"><v>1</v></c>";
        let pos = find_cell(xml).unwrap();
        assert!(xml[pos..].starts_with("<c "));
    }

    #[test]
    fn test_supported_extensions() {
        let extractor = XlsxExtractor::new();
        assert!(extractor.can_extract("xlsx"));
        assert!(!extractor.can_extract("xls"));
    }
}
