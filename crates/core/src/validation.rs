//! Input validation utilities.
//!
//! Questionnaire values are checked here before a [`crate::BusinessProfile`] is built, so
//! the matcher never sees an implausible profile.

use crate::constants::{MAX_AREA_SQM, MAX_CAPACITY_PEOPLE};
use crate::{ComplianceError, ComplianceResult};
use regubiz_corpus::FeatureFlag;
use std::collections::BTreeSet;

/// Validates a floor area in square meters.
///
/// # Errors
///
/// Returns `ComplianceError::InvalidProfile` if the area is not finite, not strictly
/// positive, or above [`MAX_AREA_SQM`].
pub fn validate_area(area_sqm: f64) -> ComplianceResult<f64> {
    if !area_sqm.is_finite() || area_sqm <= 0.0 {
        return Err(ComplianceError::InvalidProfile(format!(
            "business size must be a positive number of square meters, got {area_sqm}"
        )));
    }

    if area_sqm > MAX_AREA_SQM {
        return Err(ComplianceError::InvalidProfile(format!(
            "business size of {area_sqm} sqm exceeds the supported maximum of {MAX_AREA_SQM} sqm"
        )));
    }

    Ok(area_sqm)
}

/// Validates an occupancy figure.
///
/// # Errors
///
/// Returns `ComplianceError::InvalidProfile` if the capacity is zero or above
/// [`MAX_CAPACITY_PEOPLE`].
pub fn validate_capacity(capacity_people: u32) -> ComplianceResult<u32> {
    if capacity_people == 0 {
        return Err(ComplianceError::InvalidProfile(
            "seating capacity must be at least one person".into(),
        ));
    }

    if capacity_people > MAX_CAPACITY_PEOPLE {
        return Err(ComplianceError::InvalidProfile(format!(
            "seating capacity of {capacity_people} exceeds the supported maximum of {MAX_CAPACITY_PEOPLE}"
        )));
    }

    Ok(capacity_people)
}

/// Collects feature flags into a set, rejecting repeats.
///
/// # Errors
///
/// Returns `ComplianceError::InvalidProfile` if the same flag appears twice.
pub fn collect_features<I>(features: I) -> ComplianceResult<BTreeSet<FeatureFlag>>
where
    I: IntoIterator<Item = FeatureFlag>,
{
    let mut set = BTreeSet::new();
    for flag in features {
        if !set.insert(flag) {
            return Err(ComplianceError::InvalidProfile(format!(
                "special feature {flag} listed more than once"
            )));
        }
    }
    Ok(set)
}

/// Parses feature names (wire form, e.g. `gas_usage`) into a set.
///
/// # Errors
///
/// Returns `ComplianceError::InvalidProfile` for unknown names or repeats.
pub fn parse_features<S: AsRef<str>>(names: &[S]) -> ComplianceResult<BTreeSet<FeatureFlag>> {
    let flags = names
        .iter()
        .map(|name| {
            name.as_ref()
                .parse::<FeatureFlag>()
                .map_err(ComplianceError::InvalidProfile)
        })
        .collect::<ComplianceResult<Vec<_>>>()?;
    collect_features(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_must_be_positive_and_finite() {
        assert!(validate_area(0.0).is_err());
        assert!(validate_area(-3.0).is_err());
        assert!(validate_area(f64::NAN).is_err());
        assert!(validate_area(f64::INFINITY).is_err());
        assert_eq!(validate_area(0.5).expect("small area"), 0.5);
    }

    #[test]
    fn area_ceiling_is_inclusive() {
        assert!(validate_area(MAX_AREA_SQM).is_ok());
        assert!(validate_area(MAX_AREA_SQM + 0.1).is_err());
    }

    #[test]
    fn capacity_bounds() {
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(MAX_CAPACITY_PEOPLE).is_ok());
        assert!(validate_capacity(MAX_CAPACITY_PEOPLE + 1).is_err());
    }

    #[test]
    fn duplicate_features_are_rejected() {
        let err = collect_features([FeatureFlag::GasUsage, FeatureFlag::GasUsage])
            .expect_err("duplicate");
        assert!(matches!(err, ComplianceError::InvalidProfile(msg) if msg.contains("gas_usage")));
    }

    #[test]
    fn parses_feature_names() {
        let set = parse_features(&["delivery", "GAS_USAGE"]).expect("valid names");
        assert!(set.contains(&FeatureFlag::Delivery));
        assert!(set.contains(&FeatureFlag::GasUsage));

        let err = parse_features(&["karaoke"]).expect_err("unknown name");
        assert!(matches!(err, ComplianceError::InvalidProfile(msg) if msg.contains("karaoke")));
    }
}
