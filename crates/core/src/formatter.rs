//! Context formatting for the report generator.
//!
//! Two renderings of the same data:
//! - [`format_context`]: a deterministic plain-text block (profile, then clauses grouped by
//!   category) handed to the language model
//! - [`ReportContext`]: the structured form returned by the HTTP API, with statistics and
//!   a short [`ReportContext::prompt_context`] summary
//!
//! Everything here is a pure transformation of a profile and a [`MatchResult`].

use crate::catalog::ApplicableThresholds;
use crate::matcher::{MatchResult, MatchedClause, Priority, ResolvedConflict};
use crate::profile::{BusinessProfile, ProfileSummary};
use regubiz_corpus::FeatureFlag;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render the profile and matched clauses as a stable text block.
///
/// Clauses are grouped by category in alphabetical order, narrowest band first within a
/// category. The same inputs always produce the same text.
pub fn format_context(profile: &BusinessProfile, result: &MatchResult) -> String {
    let mut out = String::new();
    write_profile(&mut out, profile);

    let _ = writeln!(out);
    let _ = writeln!(out, "APPLICABLE REQUIREMENTS ({})", result.len());
    if result.is_empty() {
        let _ = writeln!(out, "No requirements apply to this profile.");
    }

    for (category, members) in result.by_category() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[{category}]");
        for matched in members {
            write_clause(&mut out, matched);
        }
    }

    out
}

fn write_profile(out: &mut String, profile: &BusinessProfile) {
    let _ = writeln!(out, "BUSINESS PROFILE");
    if let Some(name) = profile.business_name() {
        let _ = writeln!(out, "Name: {name}");
    }
    let _ = writeln!(out, "Type: {}", profile.business_type());
    let _ = writeln!(out, "Floor area: {} sqm", profile.area_sqm());
    let _ = writeln!(out, "Capacity: {} people", profile.capacity_people());
    let _ = writeln!(out, "Special features: {}", feature_labels(profile));
    if let Some(notes) = profile.additional_info() {
        let _ = writeln!(out, "Notes: {notes}");
    }
}

fn write_clause(out: &mut String, matched: &MatchedClause) {
    let clause = &matched.clause;
    let title = if clause.title.is_empty() {
        clause.topic.as_str()
    } else {
        clause.title.as_str()
    };
    let _ = writeln!(out, "- {} ({}) {}", clause.id, matched.priority, title);
    let _ = writeln!(out, "  Source: {}", clause.source);
    let _ = writeln!(out, "  {}", clause.content);
    if !clause.standards.is_empty() {
        let _ = writeln!(out, "  Standards: {}", clause.standards.join(", "));
    }
}

fn feature_labels(profile: &BusinessProfile) -> String {
    if profile.features().is_empty() {
        return "none".to_string();
    }
    profile
        .features()
        .iter()
        .map(|flag| flag.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Structured context
// ============================================================================

/// Everything the report generator and the HTTP API need about one match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportContext {
    pub business: BusinessSection,
    pub requirements: Vec<RequirementEntry>,
    pub categories: Vec<CategoryGroup>,
    pub priority_summary: PrioritySummary,
    pub statistics: MatchStatistics,
    pub conflicts: Vec<ResolvedConflict>,
    pub thresholds: ApplicableThresholds,
    /// Output of [`format_context`].
    pub formatted_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BusinessSection {
    pub business_name: Option<String>,
    pub business_type: String,
    pub area_sqm: f64,
    pub capacity_people: u32,
    pub features: Vec<FeatureFlag>,
    pub feature_labels: Vec<String>,
    pub additional_info: Option<String>,
    pub summary: ProfileSummary,
}

impl From<&BusinessProfile> for BusinessSection {
    fn from(profile: &BusinessProfile) -> Self {
        Self {
            business_name: profile.business_name().map(str::to_string),
            business_type: profile.business_type().to_string(),
            area_sqm: profile.area_sqm(),
            capacity_people: profile.capacity_people(),
            features: profile.features().iter().copied().collect(),
            feature_labels: profile
                .features()
                .iter()
                .map(|f| f.label().to_string())
                .collect(),
            additional_info: profile.additional_info().map(str::to_string),
            summary: profile.summary(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequirementEntry {
    pub id: String,
    pub category: String,
    pub topic: String,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub reasons: Vec<String>,
    pub source: String,
    pub standards: Vec<String>,
    pub certifications: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub requirement_ids: Vec<String>,
    pub highest_priority: Priority,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrioritySummary {
    pub critical: usize,
    pub important: usize,
    pub recommended: usize,
}

impl PrioritySummary {
    pub fn total(&self) -> usize {
        self.critical + self.important + self.recommended
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchStatistics {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_chapter: BTreeMap<u32, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    /// Largest category; ties go to the alphabetically first.
    pub most_common_category: Option<String>,
    pub conflicts_resolved: usize,
}

impl ReportContext {
    pub fn build(
        profile: &BusinessProfile,
        result: &MatchResult,
        thresholds: ApplicableThresholds,
    ) -> Self {
        let business = BusinessSection::from(profile);

        let requirements = result.iter().map(requirement_entry).collect();

        let categories = result
            .by_category()
            .into_iter()
            .filter_map(|(category, members)| {
                let highest_priority = members.iter().map(|m| m.priority).min()?;
                Some(CategoryGroup {
                    category: category.to_string(),
                    requirement_ids: members.iter().map(|m| m.id().to_string()).collect(),
                    highest_priority,
                })
            })
            .collect();

        let by_priority = result.count_by_priority();
        let priority_summary = PrioritySummary {
            critical: by_priority.get(&Priority::Critical).copied().unwrap_or(0),
            important: by_priority.get(&Priority::Important).copied().unwrap_or(0),
            recommended: by_priority.get(&Priority::Recommended).copied().unwrap_or(0),
        };

        let mut by_category = BTreeMap::new();
        let mut by_chapter = BTreeMap::new();
        for matched in result.iter() {
            *by_category.entry(matched.category().to_string()).or_insert(0) += 1;
            *by_chapter.entry(matched.clause.source.chapter).or_insert(0) += 1;
        }
        let most_common_category = by_category
            .iter()
            .fold(None::<(&String, usize)>, |best, (category, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((category, count)),
            })
            .map(|(category, _)| category.clone());

        let statistics = MatchStatistics {
            total: result.len(),
            by_category,
            by_chapter,
            by_priority,
            most_common_category,
            conflicts_resolved: result.conflicts().len(),
        };

        Self {
            business,
            requirements,
            categories,
            priority_summary,
            statistics,
            conflicts: result.conflicts().to_vec(),
            thresholds,
            formatted_text: format_context(profile, result),
        }
    }

    /// Short briefing for the model: profile line, counts and the urgent categories.
    pub fn prompt_context(&self) -> String {
        let b = &self.business;
        let mut out = String::new();

        let features = if b.feature_labels.is_empty() {
            "none".to_string()
        } else {
            b.feature_labels.join(", ")
        };
        let _ = writeln!(
            out,
            "Business: {} of {} sqm seating {} people; special features: {}",
            b.business_type, b.area_sqm, b.capacity_people, features
        );
        let _ = writeln!(
            out,
            "Size category: {:?}; capacity category: {:?}; complexity score: {:.2}",
            b.summary.size_category, b.summary.capacity_category, b.summary.complexity_score
        );
        let p = &self.priority_summary;
        let _ = writeln!(
            out,
            "Total requirements: {} (critical {}, important {}, recommended {})",
            p.total(),
            p.critical,
            p.important,
            p.recommended
        );

        for priority in [Priority::Critical, Priority::Important] {
            let names: Vec<&str> = self
                .categories
                .iter()
                .filter(|g| g.highest_priority == priority)
                .map(|g| g.category.as_str())
                .collect();
            if !names.is_empty() {
                let _ = writeln!(out, "{} categories: {}", capitalise(priority.as_str()), names.join(", "));
            }
        }

        if !self.conflicts.is_empty() {
            let _ = writeln!(
                out,
                "Overlapping requirements resolved: {}",
                self.conflicts.len()
            );
        }

        out
    }
}

fn requirement_entry(matched: &MatchedClause) -> RequirementEntry {
    let clause = &matched.clause;
    RequirementEntry {
        id: clause.id.to_string(),
        category: clause.category.clone(),
        topic: clause.topic.clone(),
        title: clause.title.clone(),
        content: clause.content.to_string(),
        priority: matched.priority,
        reasons: matched.reasons.clone(),
        source: clause.source.to_string(),
        standards: clause.standards.clone(),
        certifications: clause.certifications.clone(),
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
