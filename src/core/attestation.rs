//! Attestation hashing, signing and verification.
//!
//! This is a simulation boundary: the "signature" is a SHA-256 digest bound to
//! the evaluator address, not a hardware-backed or asymmetric signature. It
//! lets a third party check provenance of an evaluation without re-running it.
//!
//! # Verification levels
//!
//! - [`verify`]: structural provenance check (attested flag, evaluator
//!   address, signature present). This is the contract callers rely on.
//! - [`verify_integrity`]: opt-in, additionally recomputes the signature from
//!   the result content so edited results are detected.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::{Constitution, EvaluationResult, SignedEvaluation};
use crate::error::{JudgeError, Result};

/// Length of the hex-encoded evaluator address
pub const ADDRESS_LEN: usize = 42;

/// Prefix marking an engine-issued signature token
pub const SIGNATURE_PREFIX: &str = "sig_";

/// Stable pseudo-address identifying an evaluator instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorIdentity {
    address: String,
}

impl EvaluatorIdentity {
    /// Derive an identity from a secret seed
    pub fn from_seed(seed: &str) -> Result<Self> {
        if seed.trim().is_empty() {
            return Err(JudgeError::MissingSeed);
        }

        let digest = hex::encode(Sha256::digest(seed.as_bytes()));
        Ok(Self {
            address: digest[..ADDRESS_LEN].to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Canonical binding of an evaluation context
#[derive(Serialize)]
struct AttestationContext<'a> {
    constitution: &'a Constitution,
    evaluator: &'a str,
    timestamp: i64,
}

/// Hex SHA-256 over the serialized {constitution, evaluator, timestamp}
pub fn attestation_hash(
    constitution: &Constitution,
    evaluator_address: &str,
    timestamp: i64,
) -> Result<String> {
    let context = AttestationContext {
        constitution,
        evaluator: evaluator_address,
        timestamp,
    };
    let canonical = serde_json::to_vec(&context).map_err(|source| JudgeError::Serialization {
        what: "attestation context",
        source,
    })?;

    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Signature token over the serialized result, bound to the evaluator address
pub fn sign(result: &EvaluationResult) -> Result<String> {
    let canonical = serde_json::to_vec(result).map_err(|source| JudgeError::Serialization {
        what: "evaluation result",
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(result.evaluator_address.as_bytes());
    hasher.update(b":");
    hasher.update(&canonical);

    Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(hasher.finalize())))
}

/// Structural provenance check
///
/// True iff the result is marked attested, was produced by
/// `expected_address`, and carries a non-empty signature. The signature is
/// not recomputed; see [`verify_integrity`].
pub fn verify(signed: &SignedEvaluation, expected_address: &str) -> bool {
    signed.tee_attestation
        && signed.result.evaluator_address == expected_address
        && signed.signature().is_some_and(|s| !s.is_empty())
}

/// Structural check plus recomputation of the signature from content
pub fn verify_integrity(signed: &SignedEvaluation, expected_address: &str) -> Result<bool> {
    if !verify(signed, expected_address) {
        return Ok(false);
    }

    let expected = sign(&signed.result)?;
    Ok(signed.signature() == Some(expected.as_str()))
}
