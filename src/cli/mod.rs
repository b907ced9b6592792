//! Command-line interface for the claim judge.
//!
//! Provides commands for serving the HTTP endpoint, evaluating a claim
//! locally or against a remote judge, verifying a signed evaluation, and
//! inspecting the constitution and evaluator identity.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::{self, JudgeClient};
use crate::config::{self, Overrides, ResolvedConfig};
use crate::core::{attestation, constitution, EvaluationService};
use crate::domain::{Claim, Constitution, SignedEvaluation};

/// claim-judge - Constitution-based claim evaluation with attestations
#[derive(Parser, Debug)]
#[command(name = "claim-judge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Secret seed the evaluator identity is derived from (MNEMONIC is read if unset)
    #[arg(long, global = true, env = "JUDGE_SEED", hide_env_values = true)]
    pub seed: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the evaluation endpoint over HTTP
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (EIGENCLOUD_PORT is read if unset)
        #[arg(short, long, env = "JUDGE_PORT")]
        port: Option<u16>,
    },

    /// Evaluate a claim and print the signed result
    Evaluate {
        /// Claim JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Send the claim to a remote judge instead of evaluating locally
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Verify a signed evaluation
    Verify {
        /// Signed evaluation JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Expected evaluator address (derived from the seed if omitted)
        #[arg(short, long)]
        address: Option<String>,

        /// Also recompute the signature from the result content
        #[arg(long)]
        integrity: bool,
    },

    /// Show the evaluator address for the configured seed
    Identity,

    /// Show the constitution, or validate a candidate file
    Constitution {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Validate and show a constitution file instead of the embedded one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let seed = config::seed_with_fallback(self.seed);
        let seed = seed.as_deref();

        match self.command {
            Commands::Serve { host, port } => {
                let port = config::port_with_fallback(port)?;
                serve(seed, Overrides { host, port }).await
            }
            Commands::Evaluate { input, remote } => {
                evaluate(seed, input.as_deref(), remote.as_deref()).await
            }
            Commands::Verify {
                input,
                address,
                integrity,
            } => verify(seed, input.as_deref(), address, integrity),
            Commands::Identity => show_identity(seed),
            Commands::Constitution { category, file } => {
                show_constitution(category.as_deref(), file.as_deref())
            }
            Commands::Config => show_config(),
        }
    }
}

/// Read a file, or stdin when no path is given
fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Build the service from the embedded constitution and resolved config
fn build_service(seed: Option<&str>, config: &ResolvedConfig) -> Result<EvaluationService> {
    let identity = config::identity_from_seed(seed)?;
    let constitution = constitution::load().context("Embedded constitution is invalid")?;

    let service = EvaluationService::new(Arc::new(constitution), identity)
        .with_categories(config.categories.clone())?;

    Ok(service)
}

async fn serve(seed: Option<&str>, overrides: Overrides) -> Result<()> {
    let config = config::load_config(&overrides)?;
    let service = Arc::new(build_service(seed, &config)?);

    info!("Claim judge initialized with address: {}", service.evaluator_address());
    info!("Constitution version: {}", service.constitution().version);
    info!(
        "Attestation hash: {}",
        service.attestation_hash(chrono::Utc::now().timestamp_millis())?
    );

    adapters::serve(
        service,
        &config.server.bind_address(),
        config.server.max_body_bytes,
    )
    .await
}

async fn evaluate(seed: Option<&str>, input: Option<&Path>, remote: Option<&str>) -> Result<()> {
    let body = read_input(input)?;

    let signed = match remote {
        Some(url) => {
            let claim = Claim::from_json(&body).context("Malformed claim")?;
            JudgeClient::new(url).evaluate(&claim).await?
        }
        None => {
            let config = config::load_config(&Overrides::default())?;
            build_service(seed, &config)?.evaluate_json(&body)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&signed)?);

    let result = &signed.result;
    eprintln!(
        "\n[Claim {}: {}/{} rules passed, score {:.1}%, {}]",
        result.claim_id,
        result.passed_count(),
        result.rules_evaluated.len(),
        result.overall_score * 100.0,
        if result.approved { "approved" } else { "not approved" }
    );

    Ok(())
}

fn verify(seed: Option<&str>, input: Option<&Path>, address: Option<String>, integrity: bool) -> Result<()> {
    let expected = match address {
        Some(address) => address,
        None => config::identity_from_seed(seed)?.address().to_string(),
    };

    let body = read_input(input)?;
    let signed: SignedEvaluation =
        serde_json::from_slice(&body).context("Failed to parse signed evaluation")?;

    let ok = if integrity {
        attestation::verify_integrity(&signed, &expected)?
    } else {
        attestation::verify(&signed, &expected)
    };

    if !ok {
        anyhow::bail!(
            "Attestation verification failed for claim {} (expected evaluator {})",
            signed.result.claim_id,
            expected
        );
    }

    println!(
        "Verified: claim {} evaluated by {} under constitution {}",
        signed.result.claim_id, expected, signed.result.constitution_version
    );
    Ok(())
}

fn show_identity(seed: Option<&str>) -> Result<()> {
    let identity = config::identity_from_seed(seed)?;
    println!("{}", identity.address());
    Ok(())
}

fn show_constitution(category: Option<&str>, file: Option<&Path>) -> Result<()> {
    let constitution = match file {
        Some(path) => constitution::from_file(path)?,
        None => constitution::load().context("Embedded constitution is invalid")?,
    };

    if let Some(name) = category {
        if !constitution.has_category(name) {
            anyhow::bail!(
                "Unknown category '{}'. Available: {}",
                name,
                constitution.all_categories().join(", ")
            );
        }
    }

    print_constitution(&constitution, category);
    Ok(())
}

fn print_constitution(constitution: &Constitution, only: Option<&str>) {
    println!("Constitution: {}", constitution.version);
    println!("Rules: {}", constitution.rule_count());

    for category in &constitution.categories {
        if only.is_some_and(|name| name != category.name) {
            continue;
        }

        println!("\n{}", category.name);
        println!("{:<12} {:<8} {:<9} {}", "ID", "WEIGHT", "REQUIRED", "DESCRIPTION");
        println!("{}", "-".repeat(80));
        for rule in &category.rules {
            println!(
                "{:<12} {:<8.2} {:<9} {}",
                rule.id,
                rule.weight,
                if rule.required { "yes" } else { "no" },
                rule.description
            );
        }
    }

    if only.is_none() {
        println!("\nFraud indicators:");
        for indicator in &constitution.fraud_indicators {
            println!("  - {}", indicator);
        }
    }
}

fn show_config() -> Result<()> {
    let config = config::load_config(&Overrides::default())?;

    let config_file = config
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    println!("Config file: {}", config_file);
    println!("Bind address: {}", config.server.bind_address());
    println!("Max body bytes: {}", config.server.max_body_bytes);
    println!("Scored categories: {:?}", config.categories);

    Ok(())
}
