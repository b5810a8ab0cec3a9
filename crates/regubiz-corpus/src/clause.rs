//! Regulatory clause wire model and translation helpers.
//!
//! Responsibilities:
//! - Define the domain-level [`ClauseData`] carrier used by the matcher
//! - Define a strict wire model for a single `requirements[]` entry
//! - Validate an entry and translate it into domain types
//!
//! A clause that fails any check here is reported as malformed by the document loader
//! and left out of the corpus.

use crate::{Band, CorpusError, CorpusResult, FeatureFlag};
use regubiz_types::{ClauseId, NonEmptyText};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// A single regulatory requirement with its applicability condition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClauseData {
    pub id: ClauseId,
    /// Category label, lower-case (e.g. `fire_equipment`).
    pub category: String,
    /// Conflict group within the category. Defaults to the category itself.
    pub topic: String,
    pub title: String,
    pub content: NonEmptyText,
    pub applicability: Applicability,
    pub source: SourceRef,
    pub standards: Vec<String>,
    pub certifications: Vec<String>,
}

/// Conditions that must all hold for a clause to apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Applicability {
    /// Floor area band in square meters.
    pub area: Band<f64>,
    /// Occupancy band in people.
    pub capacity: Band<u32>,
    /// Every listed feature must be present on the profile.
    pub required_features: Vec<FeatureFlag>,
}

impl Applicability {
    /// `true` when the clause carries an area or capacity bound.
    pub fn has_numeric_bound(&self) -> bool {
        self.area.is_bounded() || self.capacity.is_bounded()
    }
}

/// Where a clause comes from in the source regulation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceRef {
    pub chapter: u32,
    pub section: String,
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.section.is_empty() {
            write!(f, "chapter {}", self.chapter)
        } else {
            write!(f, "chapter {} section {}", self.chapter, self.section)
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ClauseWire {
    pub requirement_id: String,
    #[serde(default)]
    pub chapter: u32,
    #[serde(default)]
    pub section: String,
    pub category: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub size_applicability: Option<SizeWire>,
    #[serde(default)]
    pub capacity_applicability: Option<CapacityWire>,
    #[serde(default)]
    pub special_features: Vec<FeatureFlag>,
    #[serde(default)]
    pub standards: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SizeWire {
    #[serde(default)]
    pub min_sqm: Option<f64>,
    #[serde(default)]
    pub max_sqm: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CapacityWire {
    #[serde(default)]
    pub min_people: Option<u32>,
    #[serde(default)]
    pub max_people: Option<u32>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Convert a wire clause into domain types, validating the condition.
pub(crate) fn wire_to_domain(wire: ClauseWire) -> CorpusResult<ClauseData> {
    let id = ClauseId::parse(&wire.requirement_id).map_err(|e| {
        CorpusError::Translation(format!(
            "invalid requirement_id {:?}: {e}",
            wire.requirement_id
        ))
    })?;

    let category = normalise_label(&wire.category)
        .ok_or_else(|| CorpusError::Translation(format!("{id}: category cannot be empty")))?;
    let topic = match wire.topic.as_deref() {
        Some(raw) => normalise_label(raw)
            .ok_or_else(|| CorpusError::Translation(format!("{id}: topic cannot be empty")))?,
        None => category.clone(),
    };

    let content = NonEmptyText::new(&wire.content)
        .map_err(|_| CorpusError::Translation(format!("{id}: content cannot be empty")))?;

    let area = match wire.size_applicability {
        Some(size) => Band::new(size.min_sqm, size.max_sqm),
        None => Band::unbounded(),
    };
    for bound in [area.min, area.max].into_iter().flatten() {
        if !bound.is_finite() || bound < 0.0 {
            return Err(CorpusError::Translation(format!(
                "{id}: area bound must be a finite non-negative number, got {bound}"
            )));
        }
    }
    if !area.is_ordered() {
        return Err(CorpusError::Translation(format!(
            "{id}: min_sqm is greater than max_sqm"
        )));
    }

    let capacity = match wire.capacity_applicability {
        Some(cap) => Band::new(cap.min_people, cap.max_people),
        None => Band::unbounded(),
    };
    if !capacity.is_ordered() {
        return Err(CorpusError::Translation(format!(
            "{id}: min_people is greater than max_people"
        )));
    }

    let mut required_features = wire.special_features;
    required_features.sort();
    required_features.dedup();

    Ok(ClauseData {
        id,
        category,
        topic,
        title: wire.title.trim().to_string(),
        content,
        applicability: Applicability {
            area,
            capacity,
            required_features,
        },
        source: SourceRef {
            chapter: wire.chapter,
            section: wire.section.trim().to_string(),
        },
        standards: wire.standards,
        certifications: wire.certifications,
    })
}

fn normalise_label(raw: &str) -> Option<String> {
    let label = raw.trim().to_ascii_lowercase();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}
