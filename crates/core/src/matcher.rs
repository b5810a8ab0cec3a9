//! Requirement matching.
//!
//! [`match_clauses`] selects the corpus clauses whose conditions a profile satisfies,
//! resolves overlaps between clauses that regulate the same thing, and annotates each
//! survivor with a priority and the reasons it applies.
//!
//! Conventions:
//! - bands are inclusive on both ends, and a missing end is unbounded
//! - a clause applies only if its area band, capacity band and feature list all pass
//! - within one `(category, topic)` group only the numerically bounded clause with the
//!   narrowest band survives; unbounded clauses never compete
//! - band tightness compares area width, then capacity width, then clause id

use crate::catalog::Corpus;
use crate::constants::{CRITICAL_CATEGORIES, MANDATORY_CATEGORIES};
use crate::profile::BusinessProfile;
use regubiz_corpus::{Band, ClauseData, FeatureFlag};
use regubiz_types::ClauseId;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// How urgently a matched clause needs attention. Declaration order is sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    Recommended,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Important => "important",
            Priority::Recommended => "recommended",
        }
    }

    /// One level more urgent; critical stays critical.
    pub fn raised(self) -> Self {
        match self {
            Priority::Critical | Priority::Important => Priority::Critical,
            Priority::Recommended => Priority::Important,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clause that applies to the profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchedClause {
    pub clause: ClauseData,
    pub priority: Priority,
    pub reasons: Vec<String>,
}

impl MatchedClause {
    pub fn id(&self) -> &ClauseId {
        &self.clause.id
    }

    pub fn category(&self) -> &str {
        &self.clause.category
    }
}

/// Record of one clause dropped in favour of a tighter one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedConflict {
    pub preferred: ClauseId,
    pub superseded: ClauseId,
    pub category: String,
    pub topic: String,
    pub reason: String,
}

/// Ordered clauses applicable to one profile, plus resolved conflicts.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchResult {
    matches: Vec<MatchedClause>,
    conflicts: Vec<ResolvedConflict>,
}

impl MatchResult {
    pub fn matches(&self) -> &[MatchedClause] {
        &self.matches
    }

    pub fn conflicts(&self) -> &[ResolvedConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchedClause> {
        self.matches.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.matches.iter().any(|m| m.clause.id.as_str() == id)
    }

    /// Matches grouped by category (alphabetical), narrowest band first within a group.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&MatchedClause>> {
        let mut groups: BTreeMap<&str, Vec<&MatchedClause>> = BTreeMap::new();
        for matched in &self.matches {
            groups.entry(matched.category()).or_default().push(matched);
        }
        for members in groups.values_mut() {
            members.sort_by(|a, b| compare_tightness(&a.clause, &b.clause));
        }
        groups
    }

    pub fn count_by_priority(&self) -> BTreeMap<Priority, usize> {
        let mut counts = BTreeMap::new();
        for matched in &self.matches {
            *counts.entry(matched.priority).or_insert(0) += 1;
        }
        counts
    }

    pub fn with_priority(&self, priority: Priority) -> impl Iterator<Item = &MatchedClause> {
        self.matches.iter().filter(move |m| m.priority == priority)
    }
}

/// `true` when every condition attached to the clause holds for the profile.
pub fn clause_applies(clause: &ClauseData, profile: &BusinessProfile) -> bool {
    let condition = &clause.applicability;
    condition.area.contains(profile.area_sqm())
        && condition.capacity.contains(profile.capacity_people())
        && condition
            .required_features
            .iter()
            .all(|flag| profile.has_feature(*flag))
}

/// Select, de-conflict, prioritise and order the clauses applicable to `profile`.
pub fn match_clauses(profile: &BusinessProfile, corpus: &Corpus) -> MatchResult {
    let applicable: Vec<&ClauseData> = corpus
        .clauses()
        .iter()
        .filter(|clause| clause_applies(clause, profile))
        .collect();

    let (kept, conflicts) = resolve_conflicts(applicable);

    let mut matches: Vec<MatchedClause> = kept
        .into_iter()
        .map(|clause| {
            let base = base_priority(clause, profile);
            let priority = if profile.is_complex() { base.raised() } else { base };
            MatchedClause {
                priority,
                reasons: reasons_for(clause, profile, base),
                clause: clause.clone(),
            }
        })
        .collect();

    warn_on_incomplete_set(profile, &matches);

    matches.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.clause.category.cmp(&b.clause.category))
            .then_with(|| compare_tightness(&a.clause, &b.clause))
    });

    tracing::debug!(
        area_sqm = profile.area_sqm(),
        capacity = profile.capacity_people(),
        matched = matches.len(),
        conflicts = conflicts.len(),
        "matched profile against {} clauses",
        corpus.len()
    );

    MatchResult { matches, conflicts }
}

/// Total order on band tightness: area width, capacity width, then clause id.
pub fn compare_tightness(a: &ClauseData, b: &ClauseData) -> Ordering {
    let (a_area, a_cap) = (a.applicability.area.width(), a.applicability.capacity.width());
    let (b_area, b_cap) = (b.applicability.area.width(), b.applicability.capacity.width());
    a_area
        .total_cmp(&b_area)
        .then_with(|| a_cap.total_cmp(&b_cap))
        .then_with(|| a.id.cmp(&b.id))
}

fn resolve_conflicts(applicable: Vec<&ClauseData>) -> (Vec<&ClauseData>, Vec<ResolvedConflict>) {
    let mut kept = Vec::with_capacity(applicable.len());
    let mut groups: BTreeMap<(&str, &str), Vec<&ClauseData>> = BTreeMap::new();

    for clause in applicable {
        if clause.applicability.has_numeric_bound() {
            groups
                .entry((clause.category.as_str(), clause.topic.as_str()))
                .or_default()
                .push(clause);
        } else {
            kept.push(clause);
        }
    }

    let mut conflicts = Vec::new();
    for ((category, topic), mut members) in groups {
        members.sort_by(|a, b| compare_tightness(a, b));
        let mut members = members.into_iter();
        let Some(winner) = members.next() else {
            continue;
        };
        for loser in members {
            tracing::debug!(
                preferred = %winner.id,
                superseded = %loser.id,
                "resolved overlapping clauses in {category}/{topic}"
            );
            conflicts.push(ResolvedConflict {
                preferred: winner.id.clone(),
                superseded: loser.id.clone(),
                category: category.to_string(),
                topic: topic.to_string(),
                reason: format!(
                    "{} has a narrower threshold band than {} for the same {} requirement",
                    winner.id, loser.id, topic
                ),
            });
        }
        kept.push(winner);
    }

    (kept, conflicts)
}

/// Priority from the clause category alone, before the complex-business raise.
fn base_priority(clause: &ClauseData, profile: &BusinessProfile) -> Priority {
    let category = clause.category.as_str();
    if CRITICAL_CATEGORIES.contains(&category) {
        Priority::Critical
    } else if category == "gas" {
        if profile.has_feature(FeatureFlag::GasUsage) {
            Priority::Critical
        } else {
            Priority::Important
        }
    } else if category == "signage" {
        Priority::Important
    } else {
        Priority::Recommended
    }
}

/// Log when the final set lacks categories every business is expected to carry.
fn warn_on_incomplete_set(profile: &BusinessProfile, matches: &[MatchedClause]) -> bool {
    let present: BTreeSet<&str> = matches.iter().map(MatchedClause::category).collect();
    let missing: Vec<&str> = MANDATORY_CATEGORIES
        .iter()
        .copied()
        .filter(|category| !present.contains(category))
        .collect();
    let gas_uncovered = profile.has_feature(FeatureFlag::GasUsage) && !present.contains("gas");

    if !missing.is_empty() {
        tracing::warn!(?missing, "requirement set lacks mandatory categories");
    }
    if gas_uncovered {
        tracing::warn!("business uses gas but no gas requirements matched");
    }
    !missing.is_empty() || gas_uncovered
}

fn reasons_for(clause: &ClauseData, profile: &BusinessProfile, base: Priority) -> Vec<String> {
    let condition = &clause.applicability;
    let mut reasons = Vec::new();

    if condition.area.is_bounded() {
        reasons.push(format!(
            "floor area of {} sqm is {}",
            profile.area_sqm(),
            describe_band(&condition.area, "sqm")
        ));
    }
    if condition.capacity.is_bounded() {
        reasons.push(format!(
            "capacity of {} people is {}",
            profile.capacity_people(),
            describe_band(&condition.capacity, "people")
        ));
    }
    for flag in &condition.required_features {
        reasons.push(format!("business {}", flag.label()));
    }
    if reasons.is_empty() {
        reasons.push("applies to every business".to_string());
    }

    if clause.category == "signage" && profile.has_feature(FeatureFlag::Delivery) {
        reasons.push("delivery service requires clear access and exit signage".to_string());
    }
    if profile.is_complex() && base != Priority::Critical {
        reasons.push(format!(
            "priority raised for a business with {} special features",
            profile.features().len()
        ));
    }

    reasons
}

/// Human-readable rendering of an inclusive band.
pub fn describe_band<T>(band: &Band<T>, unit: &str) -> String
where
    T: Copy + PartialOrd + Into<f64> + std::fmt::Display,
{
    match (band.min, band.max) {
        (Some(min), Some(max)) => format!("between {min} and {max} {unit}"),
        (Some(min), None) => format!("at least {min} {unit}"),
        (None, Some(max)) => format!("at most {max} {unit}"),
        (None, None) => format!("any number of {unit}"),
    }
}
