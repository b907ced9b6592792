//! Evaluation service: the per-request pipeline.
//!
//! hash context -> evaluate selected rules -> aggregate -> sign.
//!
//! The service holds only immutable state (constitution, identity, evaluator
//! registry, category selection), so one instance can be shared behind an
//! `Arc` and called concurrently without locking.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::attestation::{self, EvaluatorIdentity};
use super::evaluator::EvaluatorRegistry;
use super::scoring::{self, CategorySelection};
use crate::domain::{Claim, Constitution, EvaluationResult, SignedEvaluation};
use crate::error::{JudgeError, Result};

/// Evaluates claims against a fixed constitution and signs the results
#[derive(Debug, Clone)]
pub struct EvaluationService {
    constitution: Arc<Constitution>,
    identity: EvaluatorIdentity,
    registry: EvaluatorRegistry,
    categories: CategorySelection,
}

impl EvaluationService {
    /// Create a service scoring the default category with the default evaluator
    pub fn new(constitution: Arc<Constitution>, identity: EvaluatorIdentity) -> Self {
        Self {
            constitution,
            identity,
            registry: EvaluatorRegistry::default(),
            categories: CategorySelection::default(),
        }
    }

    /// Replace the rule evaluator registry
    pub fn with_registry(mut self, registry: EvaluatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Choose which categories are scored
    pub fn with_categories(mut self, categories: CategorySelection) -> Result<Self> {
        categories.validate(&self.constitution)?;
        self.categories = categories;
        Ok(self)
    }

    pub fn constitution(&self) -> &Constitution {
        &self.constitution
    }

    pub fn evaluator_address(&self) -> &str {
        self.identity.address()
    }

    pub fn categories(&self) -> &CategorySelection {
        &self.categories
    }

    /// Attestation hash for this service's context at `timestamp`
    pub fn attestation_hash(&self, timestamp: i64) -> Result<String> {
        attestation::attestation_hash(&self.constitution, self.identity.address(), timestamp)
    }

    /// Parse a JSON claim body and evaluate it
    ///
    /// A body that does not parse fails before any rule runs.
    pub fn evaluate_json(&self, body: &[u8]) -> Result<SignedEvaluation> {
        let claim = Claim::from_json(body).map_err(JudgeError::MalformedClaim)?;
        self.evaluate_claim(&claim)
    }

    /// Evaluate a claim at the current wall-clock time
    pub fn evaluate_claim(&self, claim: &Claim) -> Result<SignedEvaluation> {
        self.evaluate_claim_at(claim, Utc::now().timestamp_millis())
    }

    /// Evaluate a claim with an explicit timestamp (epoch millis)
    pub fn evaluate_claim_at(&self, claim: &Claim, timestamp: i64) -> Result<SignedEvaluation> {
        let attestation_hash = self.attestation_hash(timestamp)?;

        let mut rules_evaluated = Vec::new();
        let mut missing_documents: Vec<String> = Vec::new();

        for (category, rules) in self.categories.select(&self.constitution) {
            for rule in rules {
                let evaluation = self.registry.evaluate(category, rule, claim);

                if rule.required
                    && !evaluation.passed
                    && !missing_documents.contains(&rule.description)
                {
                    missing_documents.push(rule.description.clone());
                }

                rules_evaluated.push(evaluation);
            }
        }

        let aggregate = scoring::aggregate(&rules_evaluated);

        let result = EvaluationResult {
            claim_id: claim.claim_id.clone(),
            evaluator_address: self.identity.address().to_string(),
            constitution_version: self.constitution.version.clone(),
            rationale: aggregate.rationale(&attestation_hash),
            attestation_hash,
            overall_score: aggregate.overall_score,
            confidence: aggregate.confidence,
            approved: aggregate.approved,
            rules_evaluated,
            missing_documents,
            // No detector is wired yet; entries may only come from the catalogue
            fraud_indicators: Vec::new(),
            timestamp,
        };

        let signature = attestation::sign(&result)?;

        debug!(
            claim_id = %result.claim_id,
            passed = aggregate.passed_count,
            total = aggregate.total_count,
            score = result.overall_score,
            approved = result.approved,
            "Claim evaluated"
        );

        Ok(SignedEvaluation::new(result, signature))
    }

    /// Structural verification against this service's own address
    pub fn verify(&self, signed: &SignedEvaluation) -> bool {
        attestation::verify(signed, self.identity.address())
    }
}
