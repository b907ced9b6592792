//! Evaluation Integration Tests
//!
//! Tests for rule gating, weighted scoring, approval and category selection
//! against the embedded constitution.

use std::sync::Arc;

use claim_judge::core::constitution::{self, DEFAULT_CATEGORY};
use claim_judge::core::evaluator::{DOCUMENT_PRESENCE_CONFIDENCE, RATIONALE_MISSING_DOCUMENTS};
use claim_judge::core::{CategorySelection, EvaluationService, EvaluatorIdentity, APPROVAL_THRESHOLD};
use claim_judge::domain::{Category, Claim, Constitution, Document, DocumentType, Rule};
use claim_judge::JudgeError;

const TIMESTAMP: i64 = 1_736_294_400_000;

fn service() -> EvaluationService {
    let constitution = Arc::new(constitution::load().unwrap());
    let identity = EvaluatorIdentity::from_seed("integration test seed").unwrap();
    EvaluationService::new(constitution, identity)
}

fn documented_claim() -> Claim {
    Claim::new(
        "CLM-DOCS",
        vec![Document::new("policy.pdf", DocumentType::Policy)],
    )
}

#[test]
fn test_empty_documents_fail_required_rules_only() {
    let service = service();
    let signed = service
        .evaluate_claim_at(&Claim::new("CLM-EMPTY", vec![]), TIMESTAMP)
        .unwrap();
    let rules = service.constitution().get(DEFAULT_CATEGORY);

    assert_eq!(signed.result.rules_evaluated.len(), rules.len());
    for (rule, evaluation) in rules.iter().zip(&signed.result.rules_evaluated) {
        assert_eq!(evaluation.rule_id, rule.id);
        assert_eq!(evaluation.passed, !rule.required, "rule {}", rule.id);
        if rule.required {
            assert_eq!(evaluation.rationale, RATIONALE_MISSING_DOCUMENTS);
        }
    }
}

#[test]
fn test_empty_documents_score_matches_weight_table() {
    let service = service();
    let rules = service.constitution().get(DEFAULT_CATEGORY);

    let total: f64 = rules.iter().map(|r| r.weight).sum();
    let optional: f64 = rules.iter().filter(|r| !r.required).map(|r| r.weight).sum();
    let expected = optional / total;

    let signed = service
        .evaluate_claim_at(&Claim::new("CLM-EMPTY", vec![]), TIMESTAMP)
        .unwrap();

    assert_eq!(rules.len(), 12);
    assert_eq!(rules.iter().filter(|r| r.required).count(), 8);
    assert!((signed.result.overall_score - expected).abs() < 1e-9);
    assert!((signed.result.overall_score - 0.17 / 0.98).abs() < 1e-9);
    assert_eq!(signed.result.approved, expected >= APPROVAL_THRESHOLD);
    assert!(!signed.result.approved);
    assert_eq!(signed.result.confidence, DOCUMENT_PRESENCE_CONFIDENCE);
    assert!(signed.result.rationale.contains("4/12 rules passed"));
    assert!(signed.result.rationale.contains("Overall score: 17.3%"));
}

#[test]
fn test_one_document_passes_everything() {
    let signed = service()
        .evaluate_claim_at(&documented_claim(), TIMESTAMP)
        .unwrap();
    let result = &signed.result;

    assert!(result.rules_evaluated.iter().all(|r| r.passed));
    assert_eq!(result.overall_score, 1.0);
    assert!(result.approved);
    assert_eq!(result.confidence, DOCUMENT_PRESENCE_CONFIDENCE);
    assert!(result.rationale.contains("12/12 rules passed"));
    assert!(result.rationale.contains("Overall score: 100.0%"));
}

#[test]
fn test_result_metadata() {
    let service = service();
    let signed = service.evaluate_claim_at(&documented_claim(), TIMESTAMP).unwrap();

    assert_eq!(signed.result.claim_id, "CLM-DOCS");
    assert_eq!(signed.result.constitution_version, "v1.0");
    assert_eq!(signed.result.evaluator_address, service.evaluator_address());
    assert_eq!(signed.result.timestamp, TIMESTAMP);
    assert_eq!(signed.result.attestation_hash.len(), 64);
    assert!(signed.tee_attestation);
    assert!(signed.signature().is_some());
}

#[test]
fn test_catalogue_order_is_preserved() {
    let signed = service()
        .evaluate_claim_at(&documented_claim(), TIMESTAMP)
        .unwrap();
    let ids: Vec<&str> = signed
        .result
        .rules_evaluated
        .iter()
        .map(|r| r.rule_id.as_str())
        .collect();

    let expected: Vec<String> = (1..=12).map(|i| format!("COMP_{:03}", i)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_claim_is_not_mutated() {
    let claim = documented_claim();
    let before = claim.clone();
    service().evaluate_claim_at(&claim, TIMESTAMP).unwrap();
    assert_eq!(claim, before);
}

#[test]
fn test_all_categories_selection() {
    let service = service().with_categories(CategorySelection::All).unwrap();
    let signed = service
        .evaluate_claim_at(&Claim::new("CLM-ALL", vec![]), TIMESTAMP)
        .unwrap();

    assert_eq!(signed.result.rules_evaluated.len(), 47);
    assert_eq!(signed.result.rules_evaluated[12].rule_id, "DAMAGE_001");
    assert!(signed.result.overall_score > 0.0 && signed.result.overall_score < 1.0);
    assert_eq!(
        signed.result.approved,
        signed.result.overall_score >= APPROVAL_THRESHOLD
    );
}

#[test]
fn test_unknown_category_fails_at_construction() {
    let result = service().with_categories(CategorySelection::Only(vec!["flood".to_string()]));
    assert!(matches!(result, Err(JudgeError::UnknownCategory(_))));
}

#[test]
fn test_injected_minimal_constitution() {
    let constitution = Constitution {
        version: "mini-1".to_string(),
        categories: vec![Category {
            name: DEFAULT_CATEGORY.to_string(),
            rules: vec![
                Rule {
                    id: "M_001".to_string(),
                    description: "Heavy required check".to_string(),
                    weight: 0.9,
                    required: true,
                },
                Rule {
                    id: "M_002".to_string(),
                    description: "Light optional check".to_string(),
                    weight: 0.1,
                    required: false,
                },
            ],
        }],
        fraud_indicators: vec![],
    };
    constitution::validate(&constitution).unwrap();

    let service = EvaluationService::new(
        Arc::new(constitution),
        EvaluatorIdentity::from_seed("mini").unwrap(),
    );
    let signed = service
        .evaluate_claim_at(&Claim::new("CLM-MINI", vec![]), TIMESTAMP)
        .unwrap();

    assert_eq!(signed.result.constitution_version, "mini-1");
    assert!((signed.result.overall_score - 0.1).abs() < 1e-12);
    assert_eq!(signed.result.missing_documents, vec!["Heavy required check"]);
    assert!(!signed.result.approved);
}

#[test]
fn test_malformed_body_is_rejected_before_evaluation() {
    let service = service();

    let bodies: [&[u8]; 3] = [b"{not json", b"[]", br#"{"documents": []}"#];
    for body in bodies {
        let err = service.evaluate_json(body).unwrap_err();
        assert!(matches!(err, JudgeError::MalformedClaim(_)), "{:?}", err);
    }
}

#[test]
fn test_missing_documents_field_means_no_documents() {
    let signed = service().evaluate_json(br#"{"claim_id": "CLM-BARE"}"#).unwrap();
    assert_eq!(signed.result.passed_count(), 4);
}

#[test]
fn test_null_documents_field_means_no_documents() {
    let service = service();
    let bare = service
        .evaluate_json(br#"{"claim_id": "CLM-NULL", "documents": null}"#)
        .unwrap();
    let empty = service
        .evaluate_json(br#"{"claim_id": "CLM-NULL", "documents": []}"#)
        .unwrap();

    assert_eq!(bare.result.passed_count(), 4);
    assert_eq!(bare.result.overall_score, empty.result.overall_score);
    assert_eq!(bare.result.missing_documents, empty.result.missing_documents);
}

#[test]
fn test_concurrent_evaluations_are_independent() {
    let service = Arc::new(service());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                let docs = if i % 2 == 0 {
                    vec![Document::new("receipt.png", DocumentType::Receipt)]
                } else {
                    vec![]
                };
                let claim = Claim::new(format!("CLM-{}", i), docs);
                (i, service.evaluate_claim_at(&claim, TIMESTAMP).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (i, signed) = handle.join().unwrap();
        assert_eq!(signed.result.claim_id, format!("CLM-{}", i));
        assert_eq!(signed.result.approved, i % 2 == 0);
    }
}
