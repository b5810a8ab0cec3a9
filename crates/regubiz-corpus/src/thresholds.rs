//! Business threshold table wire model.
//!
//! The extraction step records every area/capacity figure the regulation mentions, along
//! with whether it acts as a ceiling or a floor. These are informational: they let the
//! report explain which regulatory size bands a business falls into.

use crate::{CorpusError, CorpusResult};
use serde::{Deserialize, Serialize};

/// Whether a threshold caps or floors the business attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Applies to businesses at or below the threshold.
    Maximum,
    /// Applies to businesses at or above the threshold.
    Minimum,
}

/// Which business attribute a single-dimension threshold measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdDimension {
    Area,
    Capacity,
}

/// A single-dimension threshold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThresholdData {
    pub dimension: ThresholdDimension,
    pub value: f64,
    pub trigger: TriggerType,
    pub context: String,
    pub section: String,
    pub chapter: u32,
}

impl ThresholdData {
    /// Inclusive check of a business attribute against this threshold.
    pub fn applies_to(&self, attribute: f64) -> bool {
        match self.trigger {
            TriggerType::Maximum => attribute <= self.value,
            TriggerType::Minimum => attribute >= self.value,
        }
    }
}

/// A threshold that requires both an area floor and a capacity floor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombinedThreshold {
    pub area_sqm: f64,
    pub capacity_people: u32,
    pub context: String,
    pub section: String,
}

impl CombinedThreshold {
    pub fn applies_to(&self, area_sqm: f64, capacity_people: u32) -> bool {
        area_sqm >= self.area_sqm && capacity_people >= self.capacity_people
    }
}

/// All thresholds recorded for the document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ThresholdTable {
    pub area: Vec<ThresholdData>,
    pub capacity: Vec<ThresholdData>,
    pub combined: Vec<CombinedThreshold>,
}

impl ThresholdTable {
    pub fn len(&self) -> usize {
        self.area.len() + self.capacity.len() + self.combined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AreaThresholdWire {
    pub threshold_sqm: f64,
    #[serde(default = "default_trigger")]
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub chapter: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CapacityThresholdWire {
    pub threshold_people: u32,
    #[serde(default = "default_trigger")]
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub chapter: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CombinedThresholdWire {
    pub threshold_sqm: f64,
    pub threshold_people: u32,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub section: String,
}

fn default_trigger() -> TriggerType {
    TriggerType::Maximum
}

pub(crate) fn area_to_domain(wire: AreaThresholdWire) -> CorpusResult<ThresholdData> {
    if !wire.threshold_sqm.is_finite() || wire.threshold_sqm < 0.0 {
        return Err(CorpusError::Translation(format!(
            "threshold_sqm must be a finite non-negative number, got {}",
            wire.threshold_sqm
        )));
    }
    Ok(ThresholdData {
        dimension: ThresholdDimension::Area,
        value: wire.threshold_sqm,
        trigger: wire.trigger_type,
        context: wire.context,
        section: wire.section,
        chapter: wire.chapter,
    })
}

pub(crate) fn capacity_to_domain(wire: CapacityThresholdWire) -> ThresholdData {
    ThresholdData {
        dimension: ThresholdDimension::Capacity,
        value: f64::from(wire.threshold_people),
        trigger: wire.trigger_type,
        context: wire.context,
        section: wire.section,
        chapter: wire.chapter,
    }
}

pub(crate) fn combined_to_domain(wire: CombinedThresholdWire) -> CorpusResult<CombinedThreshold> {
    if !wire.threshold_sqm.is_finite() || wire.threshold_sqm < 0.0 {
        return Err(CorpusError::Translation(format!(
            "threshold_sqm must be a finite non-negative number, got {}",
            wire.threshold_sqm
        )));
    }
    Ok(CombinedThreshold {
        area_sqm: wire.threshold_sqm,
        capacity_people: wire.threshold_people,
        context: wire.context,
        section: wire.section,
    })
}
