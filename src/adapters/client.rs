//! HTTP client for a remote claim judge.
//!
//! Callers such as the validation loop talk to the judge over HTTP; this
//! client speaks the same `/evaluate-claim` contract the server exposes.

use anyhow::{Context, Result};

use super::http::{ErrorResponse, HealthResponse, EVALUATE_PATH};
use crate::domain::{Claim, SignedEvaluation};

/// Remote judge client
pub struct JudgeClient {
    /// Base URL, e.g. http://localhost:9000
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl JudgeClient {
    /// Create a new client for a judge at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit a claim and return the signed evaluation
    pub async fn evaluate(&self, claim: &Claim) -> Result<SignedEvaluation> {
        let response = self
            .client
            .post(self.url(EVALUATE_PATH))
            .json(claim)
            .send()
            .await
            .with_context(|| format!("Failed to reach judge at {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            anyhow::bail!("Judge returned {}: {}", status, message);
        }

        response
            .json()
            .await
            .context("Failed to parse judge response")
    }

    /// Fetch the judge's health report
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .with_context(|| format!("Failed to reach judge at {}", self.base_url))?
            .error_for_status()
            .context("Judge health check failed")?;

        response
            .json()
            .await
            .context("Failed to parse health response")
    }
}
