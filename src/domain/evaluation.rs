//! Evaluation output types.
//!
//! `EvaluationResult` is what gets signed. `SignedEvaluation` is the wire
//! shape: the result plus the signature and attestation flag as sibling
//! fields, so attaching them never changes the signed content.

use serde::{Deserialize, Serialize};

use super::constitution::Rule;

/// Outcome of a single rule against a single claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub rule_id: String,
    pub description: String,
    pub weight: f64,
    pub passed: bool,
    /// Evaluator confidence in [0, 1]
    pub confidence: f64,
    pub rationale: String,
}

impl RuleEvaluation {
    /// Build an evaluation for a rule, copying its identifying fields
    pub fn for_rule(rule: &Rule, passed: bool, confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            rule_id: rule.id.clone(),
            description: rule.description.clone(),
            weight: rule.weight,
            passed,
            confidence,
            rationale: rationale.into(),
        }
    }
}

/// Full result of evaluating a claim against a constitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub claim_id: String,
    pub evaluator_address: String,
    pub constitution_version: String,
    pub attestation_hash: String,
    pub overall_score: f64,
    pub confidence: f64,
    pub approved: bool,
    /// Rule outcomes in catalogue order
    pub rules_evaluated: Vec<RuleEvaluation>,
    pub missing_documents: Vec<String>,
    pub fraud_indicators: Vec<String>,
    pub rationale: String,
    /// Evaluation time in epoch milliseconds
    pub timestamp: i64,
}

impl EvaluationResult {
    pub fn passed_count(&self) -> usize {
        self.rules_evaluated.iter().filter(|r| r.passed).count()
    }
}

/// An evaluation result with its signature attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedEvaluation {
    #[serde(flatten)]
    pub result: EvaluationResult,

    /// Opaque signature over the serialized result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tee_signature: Option<String>,

    /// Set once the result has been hashed and signed by this engine
    #[serde(default)]
    pub tee_attestation: bool,
}

impl SignedEvaluation {
    /// Attach a signature to a result and mark it attested
    pub fn new(result: EvaluationResult, signature: String) -> Self {
        Self {
            result,
            tee_signature: Some(signature),
            tee_attestation: true,
        }
    }

    /// Remove the signature, e.g. before handing the result to a party that
    /// must not be able to present it as attested
    pub fn strip_signature(mut self) -> Self {
        self.tee_signature = None;
        self
    }

    pub fn signature(&self) -> Option<&str> {
        self.tee_signature.as_deref()
    }
}
