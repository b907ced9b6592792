//! Core evaluation engine.
//!
//! This module contains:
//! - Constitution: Loading and validating the rule catalogue
//! - Evaluator: Per-rule decision strategies
//! - Scoring: Weighted aggregation and approval
//! - Attestation: Hashing, signing and verification
//! - Service: The per-claim evaluation pipeline

pub mod attestation;
pub mod constitution;
pub mod evaluator;
pub mod scoring;
pub mod service;

// Re-export commonly used types
pub use attestation::{attestation_hash, sign, verify, verify_integrity, EvaluatorIdentity};
pub use evaluator::{DocumentPresenceEvaluator, EvaluatorRegistry, RuleEvaluator};
pub use scoring::{aggregate, Aggregate, CategorySelection, APPROVAL_THRESHOLD};
pub use service::EvaluationService;
