//! Built-in sample profiles for demos and smoke tests.
//!
//! The two `edge_case_*` profiles sit either side of the chapter 5 / chapter 6 split
//! (150 sqm and 50 seats).

use crate::profile::BusinessProfile;
use crate::{ComplianceError, ComplianceResult};
use regubiz_corpus::FeatureFlag;

pub const SAMPLE_PROFILE_NAMES: [&str; 5] = [
    "small_simple",
    "medium_gas",
    "large_complex",
    "edge_case_chapter5",
    "edge_case_chapter6",
];

/// Build the named sample profile.
///
/// # Errors
///
/// Returns `ComplianceError::UnknownSampleProfile` for names not in
/// [`SAMPLE_PROFILE_NAMES`].
pub fn sample_profile(name: &str) -> ComplianceResult<BusinessProfile> {
    use FeatureFlag::{Alcohol, Delivery, GasUsage};

    let profile = match name {
        "small_simple" => {
            BusinessProfile::new(80.0, 30, [])?.with_business_name(Some("Small Coffee Shop"))
        }
        "medium_gas" => BusinessProfile::new(150.0, 80, [GasUsage])?
            .with_business_name(Some("Neighbourhood Restaurant")),
        "large_complex" => BusinessProfile::new(400.0, 200, [GasUsage, Delivery, Alcohol])?
            .with_business_name(Some("Large Restaurant and Bar")),
        "edge_case_chapter5" => BusinessProfile::new(150.0, 50, [GasUsage])?
            .with_business_name(Some("Chapter 5 Boundary")),
        "edge_case_chapter6" => BusinessProfile::new(151.0, 51, [GasUsage, Delivery])?
            .with_business_name(Some("Chapter 6 Boundary")),
        other => return Err(ComplianceError::UnknownSampleProfile(other.to_string())),
    };
    Ok(profile)
}

/// All sample profiles, in [`SAMPLE_PROFILE_NAMES`] order.
pub fn sample_profiles() -> ComplianceResult<Vec<(&'static str, BusinessProfile)>> {
    SAMPLE_PROFILE_NAMES
        .iter()
        .map(|name| sample_profile(name).map(|profile| (*name, profile)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_sample_builds() {
        let samples = sample_profiles().expect("samples are valid");
        assert_eq!(samples.len(), SAMPLE_PROFILE_NAMES.len());
        assert!(samples[2].1.is_complex());
    }

    #[test]
    fn edge_cases_straddle_the_boundary() {
        let five = sample_profile("edge_case_chapter5").expect("sample");
        let six = sample_profile("edge_case_chapter6").expect("sample");
        assert_eq!((five.area_sqm(), five.capacity_people()), (150.0, 50));
        assert_eq!((six.area_sqm(), six.capacity_people()), (151.0, 51));
    }

    fn bundled_corpus() -> crate::Corpus {
        let path = crate::resolve_corpus_path(None).expect("bundled corpus path");
        crate::Corpus::load(&path).expect("bundled corpus loads")
    }

    #[test]
    fn bundled_corpus_has_no_malformed_entries() {
        let corpus = bundled_corpus();
        assert!(corpus.skipped().is_empty(), "{:?}", corpus.skipped());
        assert!(corpus.len() > 20);
    }

    #[test]
    fn chapter5_edge_prefers_the_small_premises_clause() {
        let corpus = bundled_corpus();
        let result = crate::match_clauses(&sample_profile("edge_case_chapter5").expect("sample"), &corpus);

        assert!(result.contains("CH5_5.3.1"));
        assert!(!result.contains("CH6_6.3.1"));
        assert!(result
            .conflicts()
            .iter()
            .any(|c| c.preferred.as_str() == "CH5_5.3.1" && c.superseded.as_str() == "CH6_6.3.1"));
        assert!(result.contains("CH5_5.2.1"));
        assert!(!result.contains("CH6_6.2.1"));
    }

    #[test]
    fn chapter6_edge_switches_to_large_premises_clauses() {
        let corpus = bundled_corpus();
        let result = crate::match_clauses(&sample_profile("edge_case_chapter6").expect("sample"), &corpus);

        assert!(result.contains("CH6_6.3.1"));
        assert!(!result.contains("CH5_5.3.1"));
        assert!(result.contains("CH6_6.2.1"));
        assert!(result.contains("CH6_6.5.3"));
        let delivery = result
            .iter()
            .find(|m| m.id().as_str() == "GEN_DEL_1")
            .expect("delivery signage");
        assert!(delivery.reasons.iter().any(|r| r.contains("delivery")));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            sample_profile("food_truck"),
            Err(ComplianceError::UnknownSampleProfile(name)) if name == "food_truck"
        ));
    }
}
