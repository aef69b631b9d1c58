use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// Name of the OpenAI credential in every credential source.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SECRETS_FILE: &str = ".leadloom/secrets.yml";

/// Application configuration loaded from environment variables.
/// Everything has a default; the OpenAI credential is resolved separately
/// so that a missing key degrades the gateway instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub openai_base_url: String,
    pub secrets_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            secrets_file: std::env::var("LEADLOOM_SECRETS_FILE")
                .unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string())
                .into(),
        })
    }

    /// Credential sources in lookup order: secrets file first, then environment.
    pub fn credential_providers(&self) -> Vec<Box<dyn CredentialProvider>> {
        vec![
            Box::new(SecretsFile::new(self.secrets_file.clone())),
            Box::new(Environment),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Credential resolution
// ────────────────────────────────────────────────────────────────────────────

/// A place a secret might live.
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &str;
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Returns the first non-blank value for `key`, walking `providers` in order.
pub fn resolve_credential(key: &str, providers: &[Box<dyn CredentialProvider>]) -> Option<String> {
    providers.iter().find_map(|provider| {
        let value = provider
            .lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())?;
        debug!("Resolved {key} from {}", provider.name());
        Some(value)
    })
}

/// YAML map of secret names to values, e.g. `OPENAI_API_KEY: sk-...`.
/// A missing or malformed file simply has no secrets.
pub struct SecretsFile {
    path: PathBuf,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read secrets file {}", self.path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Secrets file {} is not a string map", self.path.display()))
    }
}

impl CredentialProvider for SecretsFile {
    fn name(&self) -> &str {
        "secrets file"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut secrets) => secrets.remove(key),
            Err(e) => {
                debug!("{e:#}");
                None
            }
        }
    }
}

/// Process environment.
pub struct Environment;

impl CredentialProvider for Environment {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
