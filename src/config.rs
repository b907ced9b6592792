//! Configuration for the claim judge.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags and environment variables (JUDGE_SEED, JUDGE_PORT,
//!    falling back to MNEMONIC and EIGENCLOUD_PORT)
//! 2. Config file (.claim-judge/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches the current directory and parents for .claim-judge/config.yaml
//! - Falls back to ~/.claim-judge/config.yaml
//!
//! The evaluator seed is secret and is never read from the config file.
//! Everything here is read once at start-up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{CategorySelection, EvaluatorIdentity};
use crate::error::JudgeError;

/// Directory holding the config file
const CONFIG_DIR: &str = ".claim-judge";
const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Environment names read when JUDGE_SEED / JUDGE_PORT are unset
pub const FALLBACK_SEED_ENV: &str = "MNEMONIC";
pub const FALLBACK_PORT_ENV: &str = "EIGENCLOUD_PORT";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Largest accepted request body
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Categories to score; `[all]` scores every category
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server: ServerSettings,
    /// Categories fed into the overall score
    pub categories: CategorySelection,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerSettings {
    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Config file in the user's home directory, if present
fn home_config_file() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    path.exists().then_some(path)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge a config file (if any) with overrides and defaults
fn resolve(config_file: Option<PathBuf>, overrides: &Overrides) -> Result<ResolvedConfig> {
    let file = config_file
        .as_deref()
        .map(load_config_file)
        .transpose()?;

    let defaults = ServerSettings::default();
    let server_file = file.as_ref().map(|f| f.server.clone()).unwrap_or_default();

    let server = ServerSettings {
        host: overrides
            .host
            .clone()
            .or(server_file.host)
            .unwrap_or(defaults.host),
        port: overrides.port.or(server_file.port).unwrap_or(defaults.port),
        max_body_bytes: server_file.max_body_bytes.unwrap_or(defaults.max_body_bytes),
    };

    let categories = file
        .as_ref()
        .and_then(|f| f.scoring.as_ref())
        .filter(|s| !s.categories.is_empty())
        .map(|s| CategorySelection::from_names(&s.categories))
        .unwrap_or_default();

    Ok(ResolvedConfig {
        server,
        categories,
        config_file,
    })
}

/// Load configuration discovered from `start_dir`
pub fn load_config_from(start_dir: &Path, overrides: &Overrides) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start_dir).or_else(home_config_file);
    resolve(config_file, overrides)
}

/// Load configuration discovered from the current directory
pub fn load_config(overrides: &Overrides) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd, overrides)
}

/// Use the seed as given, or the fallback environment variable
pub fn seed_with_fallback(seed: Option<String>) -> Option<String> {
    seed_from(seed, |name| std::env::var(name).ok())
}

/// Use the port as given, or the fallback environment variable
pub fn port_with_fallback(port: Option<u16>) -> Result<Option<u16>> {
    port_from(port, |name| std::env::var(name).ok())
}

fn seed_from(seed: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    seed.or_else(|| lookup(FALLBACK_SEED_ENV))
}

fn port_from(port: Option<u16>, lookup: impl Fn(&str) -> Option<String>) -> Result<Option<u16>> {
    if port.is_some() {
        return Ok(port);
    }

    lookup(FALLBACK_PORT_ENV)
        .map(|value| {
            value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid {}: {}", FALLBACK_PORT_ENV, value))
        })
        .transpose()
}

/// Derive the evaluator identity from the configured seed
pub fn identity_from_seed(seed: Option<&str>) -> Result<EvaluatorIdentity, JudgeError> {
    EvaluatorIdentity::from_seed(seed.ok_or(JudgeError::MissingSeed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, &Overrides::default()).unwrap();

        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.server.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.categories, CategorySelection::default());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1.0"
server:
  host: 127.0.0.1
  port: 9100
  max_body_bytes: 4096
scoring:
  categories: [completeness, policy_compliance]
"#,
        );

        let config = resolve(Some(path.clone()), &Overrides::default()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.max_body_bytes, 4096);
        assert_eq!(
            config.categories,
            CategorySelection::Only(vec![
                "completeness".to_string(),
                "policy_compliance".to_string()
            ])
        );
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_overrides_beat_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1.0\"\nserver:\n  port: 9100\n");

        let overrides = Overrides {
            host: Some("localhost".to_string()),
            port: Some(9200),
        };
        let config = resolve(Some(path), &overrides).unwrap();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.server.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_discovery_walks_parents() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1.0\"\nscoring:\n  categories: [all]\n");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(path));

        let config = load_config_from(&nested, &Overrides::default()).unwrap();
        assert_eq!(config.categories, CategorySelection::All);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "server: [not, a, map");
        assert!(resolve(Some(path), &Overrides::default()).is_err());
    }

    #[test]
    fn test_fallback_environment_names() {
        let env = |name: &str| match name {
            FALLBACK_SEED_ENV => Some("legacy words".to_string()),
            FALLBACK_PORT_ENV => Some("8080".to_string()),
            _ => None,
        };

        assert_eq!(seed_from(None, env).as_deref(), Some("legacy words"));
        assert_eq!(seed_from(Some("flag".to_string()), env).as_deref(), Some("flag"));
        assert_eq!(port_from(None, env).unwrap(), Some(8080));
        assert_eq!(port_from(Some(9100), env).unwrap(), Some(9100));

        let unset = |_: &str| None;
        assert_eq!(seed_from(None, unset), None);
        assert_eq!(port_from(None, unset).unwrap(), None);

        let bad = |_: &str| Some("eighty".to_string());
        assert!(port_from(None, bad).is_err());
    }

    #[test]
    fn test_missing_seed() {
        assert!(matches!(identity_from_seed(None), Err(JudgeError::MissingSeed)));
        assert!(identity_from_seed(Some("seed words")).is_ok());
    }
}
