//! Constants used throughout the Regu-Biz core crate.
//!
//! Regulatory limits and file locations live here so that the matcher, the validation
//! layer and the binaries agree on them.

/// Relative location of the bundled regulatory corpus.
pub const DEFAULT_CORPUS_FILE: &str = "data/fire_safety_regulatory_data.json";

/// Business type assumed when the questionnaire does not say otherwise.
pub const DEFAULT_BUSINESS_TYPE: &str = "restaurant";

/// Largest floor area accepted from the questionnaire, in square meters.
pub const MAX_AREA_SQM: f64 = 5_000.0;

/// Largest occupancy accepted from the questionnaire.
pub const MAX_CAPACITY_PEOPLE: u32 = 5_000;

/// A profile with at least this many features is treated as a complex business.
pub const COMPLEX_BUSINESS_FEATURES: usize = 3;

/// Upper bounds of the small and medium size categories, in square meters.
pub const SMALL_AREA_LIMIT_SQM: f64 = 100.0;
pub const MEDIUM_AREA_LIMIT_SQM: f64 = 300.0;

/// Upper bounds of the low and medium capacity categories.
pub const LOW_CAPACITY_LIMIT: u32 = 50;
pub const MEDIUM_CAPACITY_LIMIT: u32 = 200;

/// Categories whose clauses are always critical.
pub const CRITICAL_CATEGORIES: [&str; 3] = ["fire_equipment", "electrical", "certifications"];

/// Categories every complete requirement set is expected to contain.
pub const MANDATORY_CATEGORIES: [&str; 2] = ["fire_equipment", "certifications"];
