//! Claim input types.
//!
//! Claims are supplied by external collaborators (document ingestion, the
//! validation loop). The engine only reads them. Fields it does not know about
//! are kept in `extra` so they survive a parse/serialize cycle.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Kind of supporting document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Policy,
    Receipt,
    Photo,
    DamageReport,
    #[serde(other)]
    Other,
}

/// A supporting document attached to a claim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,

    /// Extraction confidence reported by ingestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Create a document with just a filename and type
    pub fn new(filename: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            filename: Some(filename.into()),
            document_type: Some(document_type),
            ..Default::default()
        }
    }
}

/// An insurance claim submitted for evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,

    /// Supporting documents; absent or null means none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub documents: Vec<Document>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_damage: Option<f64>,

    /// Any other claim fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claim {
    /// Create a claim with an id and documents
    pub fn new(claim_id: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            claim_id: claim_id.into(),
            documents,
            ..Default::default()
        }
    }

    /// Parse a claim from a JSON body
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn has_documents(&self) -> bool {
        !self.documents.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Document>>::deserialize(deserializer)?.unwrap_or_default())
}
