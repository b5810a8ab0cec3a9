//! Business feature flags recognised by the corpus and the questionnaire.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A special business feature that can gate a regulatory clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    /// The premises use gas (LPG or natural gas) for cooking or heating.
    GasUsage,
    /// The business serves meat.
    Meat,
    /// The business offers delivery.
    Delivery,
    /// The business serves alcoholic drinks.
    Alcohol,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 4] = [
        FeatureFlag::GasUsage,
        FeatureFlag::Meat,
        FeatureFlag::Delivery,
        FeatureFlag::Alcohol,
    ];

    /// Wire name, as used in the corpus JSON and the HTTP API.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureFlag::GasUsage => "gas_usage",
            FeatureFlag::Meat => "meat",
            FeatureFlag::Delivery => "delivery",
            FeatureFlag::Alcohol => "alcohol",
        }
    }

    /// Human-readable label used in match reasons and report context.
    pub fn label(self) -> &'static str {
        match self {
            FeatureFlag::GasUsage => "uses gas",
            FeatureFlag::Meat => "serves meat",
            FeatureFlag::Delivery => "offers delivery",
            FeatureFlag::Alcohol => "serves alcohol",
        }
    }
}

impl std::fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FeatureFlag::ALL
            .into_iter()
            .find(|flag| flag.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown feature flag: {needle}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_case_insensitively() {
        assert_eq!("gas_usage".parse::<FeatureFlag>(), Ok(FeatureFlag::GasUsage));
        assert_eq!(" Delivery ".parse::<FeatureFlag>(), Ok(FeatureFlag::Delivery));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "parking".parse::<FeatureFlag>().expect_err("unknown flag");
        assert!(err.contains("parking"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&FeatureFlag::GasUsage).expect("serialize");
        assert_eq!(json, "\"gas_usage\"");
        let flag: FeatureFlag = serde_json::from_str("\"alcohol\"").expect("deserialize");
        assert_eq!(flag, FeatureFlag::Alcohol);
    }
}
