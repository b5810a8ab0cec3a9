//! HTTP request and response bodies.
//!
//! Request types convert into validated core values; response types are built from core
//! values with `From` impls. Field names are the JSON wire names.

use regubiz_corpus::{ThresholdDimension, TriggerType};
use regubiz_core::catalog::ApplicableThresholds;
use regubiz_core::formatter::{
    BusinessSection, CategoryGroup, MatchStatistics, PrioritySummary, RequirementEntry,
};
use regubiz_core::validation::parse_features;
use regubiz_core::{
    BusinessProfile, ComplianceResult, ConnectionStatus, CorpusStatistics, GeneratedReport,
    QuestionnaireAnswers, ReportContext, ResolvedConflict,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

// ============================================================================
// Requests
// ============================================================================

/// Questionnaire form submission. Hebrew form labels are accepted as field aliases.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionnaireReq {
    #[serde(alias = "גודל העסק")]
    pub size_sqm: f64,
    #[serde(alias = "מספר מקומות ישיבה")]
    pub seating_capacity: u32,
    #[serde(default, alias = "שימוש בגז")]
    pub uses_gas: bool,
    #[serde(default, alias = "מגיש בשר")]
    pub serves_meat: bool,
    #[serde(default, alias = "משלוחים")]
    pub offers_delivery: bool,
    #[serde(default, alias = "משקאות משכרים")]
    pub serves_alcohol: bool,
    #[serde(default, alias = "שם העסק")]
    pub business_name: Option<String>,
    #[serde(default, alias = "הערות נוספות")]
    pub additional_info: Option<String>,
}

impl From<QuestionnaireReq> for QuestionnaireAnswers {
    fn from(req: QuestionnaireReq) -> Self {
        QuestionnaireAnswers {
            size_sqm: req.size_sqm,
            seating_capacity: req.seating_capacity,
            uses_gas: req.uses_gas,
            serves_meat: req.serves_meat,
            offers_delivery: req.offers_delivery,
            serves_alcohol: req.serves_alcohol,
            business_name: req.business_name,
            additional_info: req.additional_info,
        }
    }
}

/// A business profile given directly, with feature names instead of checkboxes.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BusinessProfileReq {
    pub size_sqm: f64,
    pub capacity_people: u32,
    /// Any of `gas_usage`, `meat`, `delivery`, `alcohol`.
    #[serde(default)]
    pub special_features: Vec<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl BusinessProfileReq {
    /// Validate into a core profile.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::InvalidProfile` for out-of-range numbers, unknown feature
    /// names or repeated features.
    pub fn to_profile(&self) -> ComplianceResult<BusinessProfile> {
        let features = parse_features(&self.special_features)?;
        Ok(
            BusinessProfile::new(self.size_sqm, self.capacity_people, features)?
                .with_business_name(self.business_name.as_deref())
                .with_business_type(self.business_type.as_deref().unwrap_or_default())
                .with_additional_info(self.additional_info.as_deref()),
        )
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RootRes {
    pub name: String,
    pub version: String,
    pub docs: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    /// `healthy` or `degraded`.
    pub status: String,
    pub message: String,
    pub corpus_loaded: bool,
    pub clause_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsRes {
    pub total_clauses: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_chapter: BTreeMap<String, usize>,
    pub area_thresholds: usize,
    pub capacity_thresholds: usize,
    pub combined_thresholds: usize,
    pub skipped_entries: usize,
    pub source_file: String,
    pub extraction_date: String,
}

impl From<CorpusStatistics> for StatsRes {
    fn from(stats: CorpusStatistics) -> Self {
        StatsRes {
            total_clauses: stats.total_clauses,
            by_category: stats.by_category,
            by_chapter: stats
                .by_chapter
                .into_iter()
                .map(|(chapter, count)| (chapter.to_string(), count))
                .collect(),
            area_thresholds: stats.area_thresholds,
            capacity_thresholds: stats.capacity_thresholds,
            combined_thresholds: stats.combined_thresholds,
            skipped_entries: stats.skipped_entries,
            source_file: stats.source_file,
            extraction_date: stats.extraction_date,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileRes {
    pub business_name: Option<String>,
    pub business_type: String,
    pub size_sqm: f64,
    pub capacity_people: u32,
    pub special_features: Vec<String>,
    pub feature_labels: Vec<String>,
    pub additional_info: Option<String>,
    pub size_category: String,
    pub capacity_category: String,
    pub complexity_score: f64,
}

impl From<&BusinessSection> for ProfileRes {
    fn from(b: &BusinessSection) -> Self {
        ProfileRes {
            business_name: b.business_name.clone(),
            business_type: b.business_type.clone(),
            size_sqm: b.area_sqm,
            capacity_people: b.capacity_people,
            special_features: b.features.iter().map(|f| f.as_str().to_string()).collect(),
            feature_labels: b.feature_labels.clone(),
            additional_info: b.additional_info.clone(),
            size_category: format!("{:?}", b.summary.size_category),
            capacity_category: format!("{:?}", b.summary.capacity_category),
            complexity_score: b.summary.complexity_score,
        }
    }
}

impl From<&BusinessProfile> for ProfileRes {
    fn from(profile: &BusinessProfile) -> Self {
        ProfileRes::from(&BusinessSection::from(profile))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RequirementRes {
    pub id: String,
    pub category: String,
    pub topic: String,
    pub title: String,
    pub content: String,
    /// `critical`, `important` or `recommended`.
    pub priority: String,
    pub reasons: Vec<String>,
    pub source: String,
    pub standards: Vec<String>,
    pub certifications: Vec<String>,
}

impl From<&RequirementEntry> for RequirementRes {
    fn from(r: &RequirementEntry) -> Self {
        RequirementRes {
            id: r.id.clone(),
            category: r.category.clone(),
            topic: r.topic.clone(),
            title: r.title.clone(),
            content: r.content.clone(),
            priority: r.priority.as_str().to_string(),
            reasons: r.reasons.clone(),
            source: r.source.clone(),
            standards: r.standards.clone(),
            certifications: r.certifications.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryRes {
    pub category: String,
    pub requirement_ids: Vec<String>,
    pub highest_priority: String,
}

impl From<&CategoryGroup> for CategoryRes {
    fn from(g: &CategoryGroup) -> Self {
        CategoryRes {
            category: g.category.clone(),
            requirement_ids: g.requirement_ids.clone(),
            highest_priority: g.highest_priority.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConflictRes {
    pub preferred: String,
    pub superseded: String,
    pub category: String,
    pub topic: String,
    pub reason: String,
}

impl From<&ResolvedConflict> for ConflictRes {
    fn from(c: &ResolvedConflict) -> Self {
        ConflictRes {
            preferred: c.preferred.to_string(),
            superseded: c.superseded.to_string(),
            category: c.category.clone(),
            topic: c.topic.clone(),
            reason: c.reason.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ThresholdRes {
    /// `area`, `capacity` or `combined`.
    pub kind: String,
    pub area_sqm: Option<f64>,
    pub capacity_people: Option<u32>,
    /// `maximum` or `minimum`; absent for combined thresholds, which are floors.
    pub trigger: Option<String>,
    pub context: String,
    pub section: String,
}

fn thresholds_res(thresholds: &ApplicableThresholds) -> Vec<ThresholdRes> {
    let single = thresholds
        .area
        .iter()
        .chain(thresholds.capacity.iter())
        .map(|t| {
            let (kind, area_sqm, capacity_people) = match t.dimension {
                ThresholdDimension::Area => ("area", Some(t.value), None),
                ThresholdDimension::Capacity => ("capacity", None, Some(t.value as u32)),
            };
            let trigger = match t.trigger {
                TriggerType::Maximum => "maximum",
                TriggerType::Minimum => "minimum",
            };
            ThresholdRes {
                kind: kind.into(),
                area_sqm,
                capacity_people,
                trigger: Some(trigger.into()),
                context: t.context.clone(),
                section: t.section.clone(),
            }
        });
    let combined = thresholds.combined.iter().map(|t| ThresholdRes {
        kind: "combined".into(),
        area_sqm: Some(t.area_sqm),
        capacity_people: Some(t.capacity_people),
        trigger: None,
        context: t.context.clone(),
        section: t.section.clone(),
    });
    single.chain(combined).collect()
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PrioritySummaryRes {
    pub critical: usize,
    pub important: usize,
    pub recommended: usize,
}

impl From<PrioritySummary> for PrioritySummaryRes {
    fn from(p: PrioritySummary) -> Self {
        PrioritySummaryRes {
            critical: p.critical,
            important: p.important,
            recommended: p.recommended,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchStatisticsRes {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_chapter: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub most_common_category: Option<String>,
    pub conflicts_resolved: usize,
}

impl From<&MatchStatistics> for MatchStatisticsRes {
    fn from(s: &MatchStatistics) -> Self {
        MatchStatisticsRes {
            total: s.total,
            by_category: s.by_category.clone(),
            by_chapter: s
                .by_chapter
                .iter()
                .map(|(chapter, count)| (chapter.to_string(), *count))
                .collect(),
            by_priority: s
                .by_priority
                .iter()
                .map(|(priority, count)| (priority.as_str().to_string(), *count))
                .collect(),
            most_common_category: s.most_common_category.clone(),
            conflicts_resolved: s.conflicts_resolved,
        }
    }
}

/// Matching outcome for one profile.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchRes {
    pub profile: ProfileRes,
    pub requirements: Vec<RequirementRes>,
    pub categories: Vec<CategoryRes>,
    pub priority_summary: PrioritySummaryRes,
    pub statistics: MatchStatisticsRes,
    pub conflicts: Vec<ConflictRes>,
    pub thresholds: Vec<ThresholdRes>,
    pub formatted_context: String,
}

impl From<&ReportContext> for MatchRes {
    fn from(ctx: &ReportContext) -> Self {
        MatchRes {
            profile: ProfileRes::from(&ctx.business),
            requirements: ctx.requirements.iter().map(RequirementRes::from).collect(),
            categories: ctx.categories.iter().map(CategoryRes::from).collect(),
            priority_summary: ctx.priority_summary.into(),
            statistics: MatchStatisticsRes::from(&ctx.statistics),
            conflicts: ctx.conflicts.iter().map(ConflictRes::from).collect(),
            thresholds: thresholds_res(&ctx.thresholds),
            formatted_context: ctx.formatted_text.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub report_content: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub model: String,
    pub tokens_used: Option<u32>,
    pub processing_time: Option<f64>,
    pub matching: MatchRes,
}

impl ReportRes {
    pub fn new(context: &ReportContext, report: GeneratedReport) -> Self {
        ReportRes {
            report_content: report.content,
            generated_at: report.generated_at.to_rfc3339(),
            model: report.model,
            tokens_used: report.tokens_used,
            processing_time: report.processing_time,
            matching: MatchRes::from(context),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SampleProfileRes {
    pub name: String,
    pub profile: ProfileRes,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SampleProfilesRes {
    pub profiles: Vec<SampleProfileRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptContextRes {
    pub profile_name: String,
    pub prompt_context: String,
    pub formatted_context: String,
    pub requirement_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionRes {
    pub ok: bool,
    pub model: String,
    pub message: String,
}

impl From<ConnectionStatus> for ConnectionRes {
    fn from(status: ConnectionStatus) -> Self {
        ConnectionRes {
            ok: status.ok,
            model: status.model,
            message: status.message,
        }
    }
}
