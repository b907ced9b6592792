//! Domain types for the claim judge.
//!
//! This module contains the core data structures:
//! - Constitution: Versioned, weighted rule catalogue
//! - Claim: Read-only evaluation input
//! - Evaluation: Per-rule outcomes and the signed result

pub mod claim;
pub mod constitution;
pub mod evaluation;

// Re-export commonly used types
pub use claim::{Claim, Document, DocumentType};
pub use constitution::{Category, Constitution, Rule};
pub use evaluation::{EvaluationResult, RuleEvaluation, SignedEvaluation};
