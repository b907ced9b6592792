//! Error types for the evaluation engine.
//!
//! Only start-up and input problems are expected here. Rule evaluation,
//! scoring and signing are total, so anything else is a defect.

use thiserror::Error;

/// Problems found while loading or validating a constitution
#[derive(Debug, Error)]
pub enum ConstitutionError {
    #[error("Failed to parse constitution: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Constitution version cannot be empty")]
    EmptyVersion,

    #[error("Constitution must define at least one category")]
    NoCategories,

    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("Rule {index} in category '{category}' has an empty id")]
    EmptyRuleId { category: String, index: usize },

    #[error("Duplicate rule id '{rule_id}' in category '{category}'")]
    DuplicateRuleId { category: String, rule_id: String },

    #[error("Rule '{rule_id}' in category '{category}' has weight {weight} outside (0, 1]")]
    WeightOutOfRange {
        category: String,
        rule_id: String,
        weight: f64,
    },
}

/// Errors surfaced by the evaluation engine
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Evaluator seed is not set (use --seed or JUDGE_SEED)")]
    MissingSeed,

    #[error("Malformed claim: {0}")]
    MalformedClaim(#[source] serde_json::Error),

    #[error("Failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid rule pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Constitution(#[from] ConstitutionError),
}

pub type Result<T, E = JudgeError> = std::result::Result<T, E>;
