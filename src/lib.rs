//! claim-judge - Constitution-based insurance claim evaluation
//!
//! Evaluates a claim against a fixed, versioned set of weighted rules (the
//! constitution), produces a trust score and approval decision, and signs the
//! result so a third party can later check its provenance without re-running
//! the evaluation.
//!
//! # Architecture
//!
//! - Constitutions are immutable data, loaded once and shared read-only
//! - Each evaluation is an independent, pure in-memory computation
//! - Results carry an attestation hash binding constitution, evaluator and time
//!
//! # Modules
//!
//! - `domain`: Data structures (Constitution, Claim, EvaluationResult)
//! - `core`: Engine (constitution store, evaluators, scoring, attestation, service)
//! - `adapters`: HTTP server and client
//! - `cli`: Command-line interface
//! - `config`: Start-up configuration
//!
//! # Usage
//!
//! ```bash
//! # Serve POST /evaluate-claim on port 9000
//! JUDGE_SEED="..." claim-judge serve
//!
//! # Evaluate a claim file locally
//! JUDGE_SEED="..." claim-judge evaluate --input claim.json > result.json
//!
//! # Verify a result against an evaluator address
//! claim-judge verify --input result.json --address <addr>
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use crate::core::{EvaluationService, EvaluatorIdentity};
pub use crate::domain::{Claim, Constitution, Document, EvaluationResult, Rule, RuleEvaluation, SignedEvaluation};
pub use crate::error::{ConstitutionError, JudgeError};
