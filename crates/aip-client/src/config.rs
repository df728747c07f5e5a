//! Per-client settings
//!
//! Everything a client needs besides its credential. Passed in at
//! construction; there is no process-wide configuration.

use aip_auth::{DEFAULT_REQUIRED_SCOPES, OAUTH_URL};
use common::Error;
use serde::Deserialize;
use transport::{HttpConfig, Url};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// OAuth token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Granted scopes that mark a key as a developer API key
    #[serde(default = "default_required_scopes")]
    pub required_scopes: Vec<String>,

    #[serde(default)]
    pub http: HttpConfig,
}

fn default_token_url() -> String {
    OAUTH_URL.to_string()
}

fn default_required_scopes() -> Vec<String> {
    DEFAULT_REQUIRED_SCOPES.iter().map(|s| s.to_string()).collect()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            required_scopes: default_required_scopes(),
            http: HttpConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> common::Result<()> {
        self.token_url()?;

        if self.required_scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(Error::Config(
                "required_scopes must name at least one scope".into(),
            ));
        }
        if self.http.connect_timeout_ms == 0 {
            return Err(Error::Config(
                "http.connect_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.http.timeout_ms == 0 {
            return Err(Error::Config(
                "http.timeout_ms must be greater than 0".into(),
            ));
        }
        if let Some(proxy) = &self.http.proxy {
            if proxy.host.trim().is_empty() {
                return Err(Error::Config("http.proxy.host must not be empty".into()));
            }
            if proxy.port == 0 {
                return Err(Error::Config("http.proxy.port must not be 0".into()));
            }
        }
        Ok(())
    }

    /// Parsed token endpoint. Only http and https are accepted.
    pub fn token_url(&self) -> common::Result<Url> {
        let url = Url::parse(&self.token_url)
            .map_err(|e| Error::Config(format!("token_url {:?}: {e}", self.token_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config(format!(
                "token_url must be http or https, got {other}"
            ))),
        }
    }
}
