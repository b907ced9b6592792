//! Rule evaluation strategies.
//!
//! A `RuleEvaluator` decides whether one rule holds for one claim. The
//! default `DocumentPresenceEvaluator` is a coarse gate on whether the claim
//! carries any documents at all; richer evaluators can be registered per
//! category or per rule-id pattern without touching scoring or signing.

use std::sync::Arc;

use glob::Pattern;

use crate::domain::{Claim, Rule, RuleEvaluation};
use crate::error::{JudgeError, Result};

/// Confidence reported by the document presence gate
pub const DOCUMENT_PRESENCE_CONFIDENCE: f64 = 0.85;

pub const RATIONALE_SATISFIED: &str = "Rule satisfied";
pub const RATIONALE_MISSING_DOCUMENTS: &str = "Missing required documentation";

/// Strategy for evaluating a single rule against a claim
///
/// Implementations must be total: every (rule, claim) pair gets an answer.
pub trait RuleEvaluator: Send + Sync {
    /// Human-readable evaluator name
    fn name(&self) -> &str;

    /// Evaluate `rule` (from `category`) against `claim`
    fn evaluate(&self, category: &str, rule: &Rule, claim: &Claim) -> RuleEvaluation;
}

/// Passes required rules only when the claim has at least one document;
/// optional rules always pass
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPresenceEvaluator;

impl RuleEvaluator for DocumentPresenceEvaluator {
    fn name(&self) -> &str {
        "document_presence"
    }

    fn evaluate(&self, _category: &str, rule: &Rule, claim: &Claim) -> RuleEvaluation {
        let passed = !rule.required || claim.has_documents();
        let rationale = if passed {
            RATIONALE_SATISFIED
        } else {
            RATIONALE_MISSING_DOCUMENTS
        };

        RuleEvaluation::for_rule(rule, passed, DOCUMENT_PRESENCE_CONFIDENCE, rationale)
    }
}

/// How a registered evaluator is matched to rules
#[derive(Debug, Clone)]
enum Selector {
    Category(String),
    RuleId(Pattern),
}

impl Selector {
    fn matches(&self, category: &str, rule: &Rule) -> bool {
        match self {
            Selector::Category(name) => name == category,
            Selector::RuleId(pattern) => pattern.matches(&rule.id),
        }
    }
}

/// Routes rules to evaluators; first matching registration wins
#[derive(Clone)]
pub struct EvaluatorRegistry {
    routes: Vec<(Selector, Arc<dyn RuleEvaluator>)>,
    fallback: Arc<dyn RuleEvaluator>,
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::new(Arc::new(DocumentPresenceEvaluator))
    }
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field(
                "routes",
                &self
                    .routes
                    .iter()
                    .map(|(selector, evaluator)| (selector, evaluator.name()))
                    .collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl EvaluatorRegistry {
    /// Create a registry that sends every rule to `fallback`
    pub fn new(fallback: Arc<dyn RuleEvaluator>) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Use `evaluator` for every rule in `category`
    pub fn with_category(mut self, category: impl Into<String>, evaluator: Arc<dyn RuleEvaluator>) -> Self {
        self.routes.push((Selector::Category(category.into()), evaluator));
        self
    }

    /// Use `evaluator` for rules whose id matches a glob such as `FIN_*`
    pub fn with_rule_pattern(mut self, pattern: &str, evaluator: Arc<dyn RuleEvaluator>) -> Result<Self> {
        let compiled = Pattern::new(pattern).map_err(|source| JudgeError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.routes.push((Selector::RuleId(compiled), evaluator));
        Ok(self)
    }

    /// Find the evaluator responsible for a rule
    pub fn resolve(&self, category: &str, rule: &Rule) -> &dyn RuleEvaluator {
        self.routes
            .iter()
            .find(|(selector, _)| selector.matches(category, rule))
            .map(|(_, evaluator)| evaluator.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// Evaluate a rule with whichever evaluator is responsible for it
    pub fn evaluate(&self, category: &str, rule: &Rule, claim: &Claim) -> RuleEvaluation {
        self.resolve(category, rule).evaluate(category, rule, claim)
    }
}
