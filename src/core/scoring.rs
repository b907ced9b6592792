//! Score aggregation over rule evaluations.
//!
//! The overall score is a weighted average of passed rules. Which categories
//! feed it is decided by a `CategorySelection`; by default only
//! `completeness` is scored and the remaining categories are inert data.

use serde::{Deserialize, Serialize};

use super::constitution::DEFAULT_CATEGORY;
use crate::domain::{Constitution, Rule, RuleEvaluation};
use crate::error::{JudgeError, Result};

/// Overall score at or above which a claim is approved
pub const APPROVAL_THRESHOLD: f64 = 0.8;

/// Number of attestation hash characters quoted in the rationale
const HASH_PREFIX_LEN: usize = 16;

/// Which categories contribute to the overall score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySelection {
    /// Only the named categories, in the order given
    Only(Vec<String>),
    /// Every category, in catalogue order
    All,
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::Only(vec![DEFAULT_CATEGORY.to_string()])
    }
}

impl CategorySelection {
    /// Build a selection from config values; `["all"]` selects everything
    pub fn from_names(names: &[String]) -> Self {
        if names.iter().any(|n| n == "all") {
            Self::All
        } else {
            Self::Only(names.to_vec())
        }
    }

    /// Check that every named category exists in the constitution
    pub fn validate(&self, constitution: &Constitution) -> Result<()> {
        if let Self::Only(names) = self {
            if let Some(unknown) = names.iter().find(|n| !constitution.has_category(n)) {
                return Err(JudgeError::UnknownCategory(unknown.clone()));
            }
        }
        Ok(())
    }

    /// Selected (category, rules) pairs in evaluation order
    pub fn select<'a>(&self, constitution: &'a Constitution) -> Vec<(&'a str, &'a [Rule])> {
        match self {
            Self::All => constitution
                .categories
                .iter()
                .map(|c| (c.name.as_str(), c.rules.as_slice()))
                .collect(),
            Self::Only(names) => names
                .iter()
                .filter_map(|n| constitution.category(n))
                .map(|c| (c.name.as_str(), c.rules.as_slice()))
                .collect(),
        }
    }
}

/// Aggregated outcome of a set of rule evaluations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub overall_score: f64,
    pub confidence: f64,
    pub approved: bool,
    pub passed_count: usize,
    pub total_count: usize,
}

impl Aggregate {
    /// Deterministic summary quoting the counts, score and hash prefix
    pub fn rationale(&self, attestation_hash: &str) -> String {
        let prefix: String = attestation_hash.chars().take(HASH_PREFIX_LEN).collect();
        format!(
            "Constitution evaluation: {}/{} rules passed. Overall score: {:.1}%. Attestation hash: {}...",
            self.passed_count,
            self.total_count,
            self.overall_score * 100.0,
            prefix
        )
    }
}

/// Combine rule evaluations into a score, confidence and decision
pub fn aggregate(evaluations: &[RuleEvaluation]) -> Aggregate {
    let mut total_weight = 0.0;
    let mut passed_weight = 0.0;
    let mut confidence = 0.0;
    let mut passed_count = 0;

    for (i, evaluation) in evaluations.iter().enumerate() {
        total_weight += evaluation.weight;
        // Running mean stays exact when every confidence is equal
        confidence += (evaluation.confidence - confidence) / (i + 1) as f64;
        if evaluation.passed {
            passed_weight += evaluation.weight;
            passed_count += 1;
        }
    }

    let overall_score = if total_weight > 0.0 {
        (passed_weight / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let confidence = confidence.clamp(0.0, 1.0);

    Aggregate {
        overall_score,
        confidence,
        approved: overall_score >= APPROVAL_THRESHOLD,
        passed_count,
        total_count: evaluations.len(),
    }
}
