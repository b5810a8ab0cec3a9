//! The loaded regulatory corpus.
//!
//! A [`Corpus`] is built once at startup and shared read-only (usually behind an `Arc`)
//! for the lifetime of the process.

use crate::profile::BusinessProfile;
use crate::ComplianceResult;
use regubiz_corpus::{
    ClauseData, CombinedThreshold, DocumentData, DocumentMetadata, RegulatoryDocument,
    SkippedEntry, ThresholdData, ThresholdTable,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Regulatory clauses plus the business-threshold table.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    data: DocumentData,
}

impl Corpus {
    /// Load the corpus document from disk.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::Corpus` if the file cannot be read or is not a corpus
    /// document. Malformed entries are skipped, not errors.
    pub fn load(path: &Path) -> ComplianceResult<Self> {
        Ok(Self {
            data: RegulatoryDocument::read(path)?,
        })
    }

    /// Parse a corpus document from JSON text.
    ///
    /// # Errors
    ///
    /// As [`Corpus::load`], minus I/O.
    pub fn from_json(json_text: &str) -> ComplianceResult<Self> {
        Ok(Self {
            data: RegulatoryDocument::parse(json_text)?,
        })
    }

    /// Build a corpus directly from clauses, with no thresholds or metadata.
    pub fn from_clauses(clauses: Vec<ClauseData>) -> Self {
        Self {
            data: DocumentData {
                clauses,
                ..DocumentData::default()
            },
        }
    }

    pub fn clauses(&self) -> &[ClauseData] {
        &self.data.clauses
    }

    pub fn get(&self, id: &str) -> Option<&ClauseData> {
        self.data.clauses.iter().find(|c| c.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.data.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.clauses.is_empty()
    }

    /// Entries left out at load time because they were malformed.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.data.skipped
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.data.metadata
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.data.thresholds
    }

    /// Counts over the loaded corpus.
    pub fn statistics(&self) -> CorpusStatistics {
        let mut by_category = BTreeMap::new();
        let mut by_chapter = BTreeMap::new();
        for clause in &self.data.clauses {
            *by_category.entry(clause.category.clone()).or_insert(0) += 1;
            *by_chapter.entry(clause.source.chapter).or_insert(0) += 1;
        }

        let table = &self.data.thresholds;
        CorpusStatistics {
            total_clauses: self.data.clauses.len(),
            by_category,
            by_chapter,
            area_thresholds: table.area.len(),
            capacity_thresholds: table.capacity.len(),
            combined_thresholds: table.combined.len(),
            skipped_entries: self.data.skipped.len(),
            source_file: self.data.metadata.source_file.clone(),
            extraction_date: self.data.metadata.extraction_date.clone(),
        }
    }

    /// Business thresholds the profile triggers. Comparisons are inclusive.
    pub fn applicable_thresholds(&self, profile: &BusinessProfile) -> ApplicableThresholds {
        let area = profile.area_sqm();
        let capacity = profile.capacity_people();
        let table = &self.data.thresholds;

        ApplicableThresholds {
            area: table
                .area
                .iter()
                .filter(|t| t.applies_to(area))
                .cloned()
                .collect(),
            capacity: table
                .capacity
                .iter()
                .filter(|t| t.applies_to(f64::from(capacity)))
                .cloned()
                .collect(),
            combined: table
                .combined
                .iter()
                .filter(|t| t.applies_to(area, capacity))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorpusStatistics {
    pub total_clauses: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_chapter: BTreeMap<u32, usize>,
    pub area_thresholds: usize,
    pub capacity_thresholds: usize,
    pub combined_thresholds: usize,
    pub skipped_entries: usize,
    pub source_file: String,
    pub extraction_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApplicableThresholds {
    pub area: Vec<ThresholdData>,
    pub capacity: Vec<ThresholdData>,
    pub combined: Vec<CombinedThreshold>,
}

impl ApplicableThresholds {
    pub fn len(&self) -> usize {
        self.area.len() + self.capacity.len() + self.combined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComplianceError;
    use regubiz_corpus::FeatureFlag;

    const DOC: &str = r#"{
        "metadata": {"source_file": "fire.pdf", "extraction_date": "2025-01-01"},
        "business_thresholds": {
            "area_thresholds": [
                {"threshold_sqm": 150, "trigger_type": "maximum", "chapter": 5},
                {"threshold_sqm": 150, "trigger_type": "minimum", "chapter": 6}
            ],
            "capacity_thresholds": [
                {"threshold_people": 50, "trigger_type": "maximum", "chapter": 5},
                {"threshold_people": 51, "trigger_type": "minimum", "chapter": 6}
            ],
            "combined_thresholds": [
                {"threshold_sqm": 300, "threshold_people": 200}
            ]
        },
        "requirements": [
            {"requirement_id": "A1", "chapter": 5, "category": "fire_equipment", "content": "a"},
            {"requirement_id": "A2", "chapter": 6, "category": "fire_equipment", "content": "b"},
            {"requirement_id": "G1", "chapter": 6, "category": "gas", "content": "c"},
            {"requirement_id": "", "category": "gas", "content": "d"}
        ]
    }"#;

    #[test]
    fn statistics_count_categories_and_chapters() {
        let corpus = Corpus::from_json(DOC).expect("parse");
        let stats = corpus.statistics();

        assert_eq!(stats.total_clauses, 3);
        assert_eq!(stats.by_category.get("fire_equipment"), Some(&2));
        assert_eq!(stats.by_category.get("gas"), Some(&1));
        assert_eq!(stats.by_chapter.get(&6), Some(&2));
        assert_eq!(stats.area_thresholds, 2);
        assert_eq!(stats.combined_thresholds, 1);
        assert_eq!(stats.skipped_entries, 1);
        assert_eq!(stats.source_file, "fire.pdf");
    }

    #[test]
    fn applicable_thresholds_are_inclusive() {
        let corpus = Corpus::from_json(DOC).expect("parse");

        let at_boundary = BusinessProfile::new(150.0, 50, []).expect("profile");
        let hits = corpus.applicable_thresholds(&at_boundary);
        assert_eq!(hits.area.len(), 2);
        assert_eq!(hits.capacity.len(), 1);
        assert!(hits.combined.is_empty());

        let large = BusinessProfile::new(300.0, 200, [FeatureFlag::GasUsage]).expect("profile");
        let hits = corpus.applicable_thresholds(&large);
        assert_eq!(hits.area.len(), 1);
        assert_eq!(hits.capacity.len(), 1);
        assert_eq!(hits.combined.len(), 1);
    }

    #[test]
    fn lookup_by_id() {
        let corpus = Corpus::from_json(DOC).expect("parse");
        assert_eq!(corpus.get("G1").map(|c| c.category.as_str()), Some("gas"));
        assert!(corpus.get("missing").is_none());
    }

    #[test]
    fn non_json_document_is_an_error() {
        let err = Corpus::from_json("not json").expect_err("invalid");
        assert!(matches!(err, ComplianceError::Corpus(_)));
    }
}
