//! Whole-document loading for the regulatory corpus.
//!
//! The document itself must be valid JSON with a `requirements` array; anything less is a
//! fatal error. Individual entries inside `requirements` and `business_thresholds` are
//! parsed one at a time, and an entry that does not fit the wire schema (or fails
//! validation) is skipped with a warning instead of aborting the load.

use crate::clause::{self, ClauseData, ClauseWire};
use crate::thresholds::{self, ThresholdTable};
use crate::{CorpusError, CorpusResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Descriptive metadata recorded by the extraction step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub extraction_date: String,
    #[serde(default)]
    pub chapters_processed: Vec<u32>,
}

/// An entry that was left out of the corpus because it was malformed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Array the entry came from, e.g. `requirements` or `area_thresholds`.
    pub collection: &'static str,
    pub index: usize,
    /// The entry's `requirement_id`, when one could be read.
    pub id: Option<String>,
    pub reason: String,
}

/// Domain-level result of loading a corpus document.
#[derive(Clone, Debug, Default)]
pub struct DocumentData {
    pub metadata: DocumentMetadata,
    pub clauses: Vec<ClauseData>,
    pub thresholds: ThresholdTable,
    pub skipped: Vec<SkippedEntry>,
}

/// Regulatory document operations.
///
/// Zero-sized type used for namespacing; all methods are associated functions.
pub struct RegulatoryDocument;

impl RegulatoryDocument {
    /// Read and parse a corpus document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Io`] if the file cannot be read, otherwise as [`Self::parse`].
    pub fn read(path: &Path) -> CorpusResult<DocumentData> {
        let text = std::fs::read_to_string(path)?;
        let data = Self::parse(&text)?;
        tracing::info!(
            "loaded {} clauses and {} thresholds from {} ({} skipped)",
            data.clauses.len(),
            data.thresholds.len(),
            path.display(),
            data.skipped.len()
        );
        Ok(data)
    }

    /// Parse a corpus document from JSON text.
    ///
    /// Uses `serde_path_to_error` so that schema mismatches name the failing field, both for
    /// the document envelope and for skipped entries.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Translation`] if the text is not JSON or the envelope does not
    /// match (for example `requirements` is missing or not an array). Malformed entries are
    /// not errors; they are listed in [`DocumentData::skipped`].
    pub fn parse(json_text: &str) -> CorpusResult<DocumentData> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire: DocumentWire = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|err| schema_error("Corpus document", err))?;

        let mut skipped = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut clauses = Vec::with_capacity(wire.requirements.len());

        for (index, value) in wire.requirements.iter().enumerate() {
            let id = value
                .get("requirement_id")
                .and_then(Value::as_str)
                .map(str::to_string);

            let parsed = parse_entry::<ClauseWire>(value)
                .and_then(|w| clause::wire_to_domain(w).map_err(|e| e.to_string()));

            match parsed {
                Ok(clause) if !seen_ids.insert(clause.id.clone()) => {
                    skip(
                        &mut skipped,
                        "requirements",
                        index,
                        id,
                        format!("duplicate requirement_id {}", clause.id),
                    );
                }
                Ok(clause) => clauses.push(clause),
                Err(reason) => skip(&mut skipped, "requirements", index, id, reason),
            }
        }

        let mut table = ThresholdTable::default();
        for (index, value) in wire.business_thresholds.area_thresholds.iter().enumerate() {
            match parse_entry(value)
                .and_then(|w| thresholds::area_to_domain(w).map_err(|e| e.to_string()))
            {
                Ok(t) => table.area.push(t),
                Err(reason) => skip(&mut skipped, "area_thresholds", index, None, reason),
            }
        }
        for (index, value) in wire
            .business_thresholds
            .capacity_thresholds
            .iter()
            .enumerate()
        {
            match parse_entry(value).map(thresholds::capacity_to_domain) {
                Ok(t) => table.capacity.push(t),
                Err(reason) => skip(&mut skipped, "capacity_thresholds", index, None, reason),
            }
        }
        for (index, value) in wire
            .business_thresholds
            .combined_thresholds
            .iter()
            .enumerate()
        {
            match parse_entry(value)
                .and_then(|w| thresholds::combined_to_domain(w).map_err(|e| e.to_string()))
            {
                Ok(t) => table.combined.push(t),
                Err(reason) => skip(&mut skipped, "combined_thresholds", index, None, reason),
            }
        }

        Ok(DocumentData {
            metadata: wire.metadata,
            clauses,
            thresholds: table,
            skipped,
        })
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Envelope of the corpus document. Unknown top-level keys (standards tables and the
/// like written by the extraction step) are ignored.
#[derive(Debug, Deserialize)]
struct DocumentWire {
    #[serde(default)]
    metadata: DocumentMetadata,
    #[serde(default)]
    business_thresholds: ThresholdsWire,
    requirements: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ThresholdsWire {
    #[serde(default)]
    area_thresholds: Vec<Value>,
    #[serde(default)]
    capacity_thresholds: Vec<Value>,
    #[serde(default)]
    combined_thresholds: Vec<Value>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn parse_entry<T: DeserializeOwned>(value: &Value) -> Result<T, String> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        format!("schema mismatch at {path}: {source}")
    })
}

fn schema_error(what: &str, err: serde_path_to_error::Error<serde_json::Error>) -> CorpusError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    CorpusError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}

fn skip(
    skipped: &mut Vec<SkippedEntry>,
    collection: &'static str,
    index: usize,
    id: Option<String>,
    reason: String,
) {
    tracing::warn!(
        collection,
        index,
        id = id.as_deref().unwrap_or("<none>"),
        "skipping malformed corpus entry: {reason}"
    );
    skipped.push(SkippedEntry {
        collection,
        index,
        id,
        reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureFlag;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{EnvFilter, Layer};

    const SAMPLE: &str = r#"{
        "metadata": {"source_file": "fire.pdf", "chapters_processed": [5, 6]},
        "business_thresholds": {
            "area_thresholds": [
                {"threshold_sqm": 150, "trigger_type": "maximum", "section": "5.1", "chapter": 5},
                {"threshold_sqm": "big"}
            ],
            "capacity_thresholds": [
                {"threshold_people": 50, "trigger_type": "maximum", "chapter": 5}
            ],
            "combined_thresholds": [
                {"threshold_sqm": 300, "threshold_people": 200}
            ]
        },
        "israeli_standards": [],
        "requirements": [
            {"requirement_id": "CH5_1", "category": "fire_equipment", "content": "Extinguisher.",
             "capacity_applicability": {"max_people": 50}},
            {"requirement_id": "CH6_1", "category": "gas", "content": "Gas shutoff valve.",
             "special_features": ["gas_usage"]},
            {"requirement_id": "BAD_1", "category": "gas", "content": "x",
             "special_features": ["rocket_fuel"]},
            {"requirement_id": "CH5_1", "category": "general", "content": "Duplicate id."},
            {"category": "general", "content": "No id."},
            42
        ]
    }"#;

    #[test]
    fn parses_valid_entries_and_skips_malformed_ones() {
        let data = RegulatoryDocument::parse(SAMPLE).expect("parse document");

        let ids: Vec<&str> = data.clauses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CH5_1", "CH6_1"]);
        assert_eq!(
            data.clauses[1].applicability.required_features,
            vec![FeatureFlag::GasUsage]
        );

        let skipped_requirements: Vec<usize> = data
            .skipped
            .iter()
            .filter(|s| s.collection == "requirements")
            .map(|s| s.index)
            .collect();
        assert_eq!(skipped_requirements, vec![2, 3, 4, 5]);

        assert_eq!(data.thresholds.area.len(), 1);
        assert_eq!(data.thresholds.capacity.len(), 1);
        assert_eq!(data.thresholds.combined.len(), 1);
        assert_eq!(data.metadata.chapters_processed, vec![5, 6]);
    }

    struct CountWarnings(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountWarnings {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn skip_warnings_pass_the_binaries_log_filter() {
        // The binaries install `regubiz=info`; skipped entries must not be filtered out.
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("regubiz=info"))
            .with(CountWarnings(Arc::clone(&warnings)));

        let data = tracing::subscriber::with_default(subscriber, || {
            RegulatoryDocument::parse(SAMPLE).expect("parse document")
        });

        assert_eq!(warnings.load(Ordering::SeqCst), data.skipped.len());
        assert!(!data.skipped.is_empty());
    }

    #[test]
    fn skipped_entries_carry_field_paths() {
        let data = RegulatoryDocument::parse(SAMPLE).expect("parse document");

        let bad_feature = data
            .skipped
            .iter()
            .find(|s| s.id.as_deref() == Some("BAD_1"))
            .expect("BAD_1 skipped");
        assert!(bad_feature.reason.contains("special_features"));

        let duplicate = data
            .skipped
            .iter()
            .find(|s| s.index == 3 && s.collection == "requirements")
            .expect("duplicate skipped");
        assert!(duplicate.reason.contains("duplicate"));

        let bad_threshold = data
            .skipped
            .iter()
            .find(|s| s.collection == "area_thresholds")
            .expect("threshold skipped");
        assert!(bad_threshold.reason.contains("threshold_sqm"));
    }

    #[test]
    fn missing_requirements_array_is_fatal() {
        let err = RegulatoryDocument::parse(r#"{"metadata": {}}"#).expect_err("no requirements");
        assert!(matches!(err, CorpusError::Translation(msg) if msg.contains("requirements")));
    }

    #[test]
    fn invalid_json_is_fatal() {
        let err = RegulatoryDocument::parse("{ not json").expect_err("invalid json");
        assert!(matches!(err, CorpusError::Translation(_)));
    }

    #[test]
    fn reads_document_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");

        let data = RegulatoryDocument::read(file.path()).expect("read document");
        assert_eq!(data.clauses.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = RegulatoryDocument::read(&dir.path().join("absent.json"))
            .expect_err("missing file");
        assert!(matches!(err, CorpusError::Io(_)));
    }
}
