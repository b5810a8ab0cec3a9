//! Business profile domain type.
//!
//! A [`BusinessProfile`] is the validated form of one questionnaire submission. It can only
//! be built through [`BusinessProfile::new`] (or [`QuestionnaireAnswers::into_profile`]),
//! both of which run the checks in [`crate::validation`], so every profile the matcher sees
//! is within the plausibility ceilings.

use crate::constants::{
    COMPLEX_BUSINESS_FEATURES, DEFAULT_BUSINESS_TYPE, LOW_CAPACITY_LIMIT, MEDIUM_AREA_LIMIT_SQM,
    MEDIUM_CAPACITY_LIMIT, SMALL_AREA_LIMIT_SQM,
};
use crate::validation::{collect_features, validate_area, validate_capacity};
use crate::ComplianceResult;
use regubiz_corpus::FeatureFlag;
use regubiz_types::NonEmptyText;
use serde::Serialize;
use std::collections::BTreeSet;

/// Validated business characteristics for a single request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BusinessProfile {
    area_sqm: f64,
    capacity_people: u32,
    features: BTreeSet<FeatureFlag>,
    business_name: Option<NonEmptyText>,
    business_type: String,
    additional_info: Option<NonEmptyText>,
}

impl BusinessProfile {
    /// Build a profile from raw attributes.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::InvalidProfile` if the area or capacity is out of range or a
    /// feature is repeated.
    pub fn new<I>(area_sqm: f64, capacity_people: u32, features: I) -> ComplianceResult<Self>
    where
        I: IntoIterator<Item = FeatureFlag>,
    {
        Ok(Self {
            area_sqm: validate_area(area_sqm)?,
            capacity_people: validate_capacity(capacity_people)?,
            features: collect_features(features)?,
            business_name: None,
            business_type: DEFAULT_BUSINESS_TYPE.to_string(),
            additional_info: None,
        })
    }

    pub fn with_business_name(mut self, name: Option<&str>) -> Self {
        self.business_name = NonEmptyText::from_optional(name);
        self
    }

    /// Blank input keeps the default `restaurant` type.
    pub fn with_business_type(mut self, business_type: &str) -> Self {
        let trimmed = business_type.trim();
        if !trimmed.is_empty() {
            self.business_type = trimmed.to_string();
        }
        self
    }

    pub fn with_additional_info(mut self, info: Option<&str>) -> Self {
        self.additional_info = NonEmptyText::from_optional(info);
        self
    }

    pub fn area_sqm(&self) -> f64 {
        self.area_sqm
    }

    pub fn capacity_people(&self) -> u32 {
        self.capacity_people
    }

    pub fn features(&self) -> &BTreeSet<FeatureFlag> {
        &self.features
    }

    pub fn has_feature(&self, flag: FeatureFlag) -> bool {
        self.features.contains(&flag)
    }

    pub fn business_name(&self) -> Option<&str> {
        self.business_name.as_ref().map(NonEmptyText::as_str)
    }

    pub fn business_type(&self) -> &str {
        &self.business_type
    }

    pub fn additional_info(&self) -> Option<&str> {
        self.additional_info.as_ref().map(NonEmptyText::as_str)
    }

    /// `true` when the profile has enough features to raise clause priorities.
    pub fn is_complex(&self) -> bool {
        self.features.len() >= COMPLEX_BUSINESS_FEATURES
    }

    /// Derived categories and complexity score.
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary::of(self)
    }
}

/// Raw questionnaire form: the four checkbox answers plus the numeric fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestionnaireAnswers {
    pub size_sqm: f64,
    pub seating_capacity: u32,
    pub uses_gas: bool,
    pub serves_meat: bool,
    pub offers_delivery: bool,
    pub serves_alcohol: bool,
    pub business_name: Option<String>,
    pub additional_info: Option<String>,
}

impl QuestionnaireAnswers {
    /// Feature flags ticked on the form.
    pub fn features(&self) -> Vec<FeatureFlag> {
        [
            (self.uses_gas, FeatureFlag::GasUsage),
            (self.serves_meat, FeatureFlag::Meat),
            (self.offers_delivery, FeatureFlag::Delivery),
            (self.serves_alcohol, FeatureFlag::Alcohol),
        ]
        .into_iter()
        .filter_map(|(ticked, flag)| ticked.then_some(flag))
        .collect()
    }

    /// Validate the answers and build a profile.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::InvalidProfile` as [`BusinessProfile::new`].
    pub fn into_profile(self) -> ComplianceResult<BusinessProfile> {
        let features = self.features();
        Ok(
            BusinessProfile::new(self.size_sqm, self.seating_capacity, features)?
                .with_business_name(self.business_name.as_deref())
                .with_additional_info(self.additional_info.as_deref()),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CapacityCategory {
    Low,
    Medium,
    High,
}

/// Coarse description of a profile, used in report context.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub size_category: SizeCategory,
    pub capacity_category: CapacityCategory,
    pub feature_count: usize,
    /// In `[0, 1]`; higher means more regulatory surface.
    pub complexity_score: f64,
}

impl ProfileSummary {
    fn of(profile: &BusinessProfile) -> Self {
        let area = profile.area_sqm();
        let capacity = profile.capacity_people();

        let size_category = if area <= SMALL_AREA_LIMIT_SQM {
            SizeCategory::Small
        } else if area <= MEDIUM_AREA_LIMIT_SQM {
            SizeCategory::Medium
        } else {
            SizeCategory::Large
        };

        let capacity_category = if capacity <= LOW_CAPACITY_LIMIT {
            CapacityCategory::Low
        } else if capacity <= MEDIUM_CAPACITY_LIMIT {
            CapacityCategory::Medium
        } else {
            CapacityCategory::High
        };

        let feature_count = profile.features().len();
        let score = (area / 1000.0).min(0.5)
            + (f64::from(capacity) / 500.0).min(0.3)
            + 0.05 * feature_count as f64;

        Self {
            size_category,
            capacity_category,
            feature_count,
            complexity_score: score.min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComplianceError;

    #[test]
    fn questionnaire_converts_to_profile() {
        let answers = QuestionnaireAnswers {
            size_sqm: 120.0,
            seating_capacity: 40,
            uses_gas: true,
            offers_delivery: true,
            business_name: Some("  Falafel Corner ".into()),
            additional_info: Some("   ".into()),
            ..Default::default()
        };

        let profile = answers.into_profile().expect("valid answers");
        assert_eq!(profile.area_sqm(), 120.0);
        assert_eq!(profile.capacity_people(), 40);
        assert!(profile.has_feature(FeatureFlag::GasUsage));
        assert!(profile.has_feature(FeatureFlag::Delivery));
        assert!(!profile.has_feature(FeatureFlag::Meat));
        assert_eq!(profile.business_name(), Some("Falafel Corner"));
        assert_eq!(profile.additional_info(), None);
        assert_eq!(profile.business_type(), "restaurant");
    }

    #[test]
    fn invalid_answers_are_rejected() {
        let answers = QuestionnaireAnswers {
            size_sqm: 0.0,
            seating_capacity: 10,
            ..Default::default()
        };
        assert!(matches!(
            answers.into_profile(),
            Err(ComplianceError::InvalidProfile(_))
        ));
    }

    #[test]
    fn blank_business_type_keeps_default() {
        let profile = BusinessProfile::new(50.0, 10, [])
            .expect("valid")
            .with_business_type("  ");
        assert_eq!(profile.business_type(), "restaurant");

        let cafe = profile.with_business_type("cafe");
        assert_eq!(cafe.business_type(), "cafe");
    }

    #[test]
    fn summary_categories_use_inclusive_limits() {
        let small = BusinessProfile::new(100.0, 50, []).expect("valid").summary();
        assert_eq!(small.size_category, SizeCategory::Small);
        assert_eq!(small.capacity_category, CapacityCategory::Low);

        let medium = BusinessProfile::new(300.0, 200, []).expect("valid").summary();
        assert_eq!(medium.size_category, SizeCategory::Medium);
        assert_eq!(medium.capacity_category, CapacityCategory::Medium);

        let large = BusinessProfile::new(300.5, 201, []).expect("valid").summary();
        assert_eq!(large.size_category, SizeCategory::Large);
        assert_eq!(large.capacity_category, CapacityCategory::High);
    }

    #[test]
    fn complexity_score_is_capped() {
        let summary = BusinessProfile::new(400.0, 200, [FeatureFlag::GasUsage, FeatureFlag::Delivery])
            .expect("valid")
            .summary();
        assert!((summary.complexity_score - (0.4 + 0.3 + 0.1)).abs() < 1e-9);

        let huge = BusinessProfile::new(5000.0, 5000, FeatureFlag::ALL)
            .expect("valid")
            .summary();
        assert!((huge.complexity_score - 1.0).abs() < 1e-9);
        assert_eq!(huge.feature_count, 4);
    }
}
