//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The API secret is loaded from the AIP_SECRET_KEY env var or
//! secret_key_file, never stored in the TOML directly.

use aip_auth::Credential;
use aip_client::ClientConfig;
use common::Secret;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SECRET_ENV: &str = "AIP_SECRET_KEY";
const CONFIG_ENV: &str = "AIP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "aip.toml";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Key pair issued by the console
#[derive(Debug, Deserialize)]
pub struct CredentialsConfig {
    pub app_id: String,
    /// API key or cloud access key
    pub api_key: String,
    #[serde(skip)]
    pub secret_key: Option<Secret<String>>,
    /// Path to a file containing the secret (alternative to AIP_SECRET_KEY)
    #[serde(default)]
    pub secret_key_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Secret resolution order:
    /// 1. AIP_SECRET_KEY env var
    /// 2. secret_key_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.credentials.app_id.trim().is_empty() {
            return Err(common::Error::Config("credentials.app_id must not be empty".into()));
        }
        if config.credentials.api_key.trim().is_empty() {
            return Err(common::Error::Config("credentials.api_key must not be empty".into()));
        }
        config.client.validate()?;

        if let Ok(secret) = std::env::var(SECRET_ENV) {
            config.credentials.secret_key = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.credentials.secret_key_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read secret_key_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.credentials.secret_key = Some(Secret::new(secret));
            }
        }

        Ok(config)
    }

    /// The client credential. Fails if no secret was resolved.
    pub fn credential(&self) -> common::Result<Credential> {
        let secret = self
            .credentials
            .secret_key
            .clone()
            .ok_or(common::Error::MissingCredential(
                "AIP_SECRET_KEY or credentials.secret_key_file",
            ))?;
        Ok(Credential::new(
            self.credentials.app_id.as_str(),
            self.credentials.api_key.as_str(),
            secret,
        ))
    }

    /// Resolve config file path from CLI arg or AIP_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }
}
