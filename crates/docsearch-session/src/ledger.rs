//! Append-only ledger of executed queries.

use chrono::Utc;
use docsearch_core::{format_score, ExportError, QueryLogEntry, RankedName, ScoredResult};
use tracing::debug;

/// Session-scoped query history.
///
/// Entries are appended with monotonically increasing sequence numbers and
/// never mutated or deleted. The CSV export is deterministic: the same
/// ledger state always serializes to identical bytes.
#[derive(Default)]
pub struct QueryLedger {
    entries: Vec<QueryLogEntry>,
}

impl QueryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an executed query and its top results.
    pub fn record(&mut self, query: &str, results: &[ScoredResult]) -> &QueryLogEntry {
        let entry = QueryLogEntry {
            seq: self.entries.len() as u64 + 1,
            query: query.to_string(),
            top_results: results
                .iter()
                .map(|r| RankedName {
                    name: r.name.clone(),
                    score: r.score,
                })
                .collect(),
            recorded_at: Utc::now(),
        };
        debug!("Recording query #{} ({} results)", entry.seq, results.len());
        self.entries.push(entry);
        self.entries.last().expect("entry was just pushed")
    }

    /// All entries, in recording order.
    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    /// Number of recorded queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no queries have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the ledger as CSV with header `Query,TopResults`.
    ///
    /// The `TopResults` cell is a semicolon-separated list of `name:score`
    /// pairs, scores at 4 decimal places (matching the ranking display).
    /// An empty ledger exports a header-only CSV.
    pub fn export(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Query", "TopResults"])
            .map_err(|e| ExportError::Csv(e.to_string()))?;

        for entry in &self.entries {
            writer
                .write_record([entry.query.as_str(), &encode_results(&entry.top_results)])
                .map_err(|e| ExportError::Csv(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Csv(e.to_string()))
    }
}

fn encode_results(results: &[RankedName]) -> String {
    results
        .iter()
        .map(|r| format!("{}:{}", r.name, format_score(r.score)))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn result(name: &str, score: f32) -> ScoredResult {
        ScoredResult {
            doc_id: Uuid::new_v4(),
            name: name.to_string(),
            score,
            preview: String::new(),
        }
    }

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let mut ledger = QueryLedger::new();
        let first = ledger.record("one", &[]).seq;
        let second = ledger.record("two", &[]).seq;
        let third = ledger.record("three", &[]).seq;

        assert_eq!((first, second, third), (1, 2, 3));
    }

    #[test]
    fn test_entries_never_mutated_by_later_records() {
        let mut ledger = QueryLedger::new();
        ledger.record("first", &[result("a.txt", 0.9)]);
        ledger.record("second", &[result("b.txt", 0.8)]);

        let entries: Vec<_> = ledger.entries().collect();
        assert_eq!(entries[0].query, "first");
        assert_eq!(entries[0].top_results[0].name, "a.txt");
        assert_eq!(entries[1].query, "second");
    }

    #[test]
    fn test_export_empty_ledger_is_header_only() {
        let ledger = QueryLedger::new();
        let bytes = ledger.export().unwrap();
        assert_eq!(bytes, b"Query,TopResults\n");
    }

    #[test]
    fn test_export_is_deterministic() {
        let mut ledger = QueryLedger::new();
        ledger.record("cats", &[result("a.txt", 0.9123), result("b.txt", 0.5)]);

        let first = ledger.export().unwrap();
        let second = ledger.export().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_format() {
        let mut ledger = QueryLedger::new();
        ledger.record("cats", &[result("a.txt", 0.9123), result("b.txt", 0.5)]);

        let text = String::from_utf8(ledger.export().unwrap()).unwrap();
        assert_eq!(text, "Query,TopResults\ncats,a.txt:0.9123;b.txt:0.5000\n");
    }

    #[test]
    fn test_export_quotes_queries_with_commas() {
        let mut ledger = QueryLedger::new();
        ledger.record("cats, dogs", &[result("a.txt", 1.0)]);

        let text = String::from_utf8(ledger.export().unwrap()).unwrap();
        assert!(text.contains("\"cats, dogs\""));
    }

    #[test]
    fn test_export_round_trip() {
        let mut ledger = QueryLedger::new();
        ledger.record("cats, or dogs?", &[result("a.txt", 0.912_34)]);
        ledger.record("empty", &[]);

        let bytes = ledger.export().unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(vec!["Query", "TopResults"])
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "cats, or dogs?");
        assert_eq!(&rows[0][1], "a.txt:0.9123");
        assert_eq!(&rows[1][0], "empty");
        assert_eq!(&rows[1][1], "");
    }
}
