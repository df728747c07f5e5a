//! reqwest-backed transport and its connection settings

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::request::{AipRequest, AipResponse};
use crate::{Result, Transport, TransportError};

/// Headers reqwest derives from the URL and body itself.
const DERIVED_HEADERS: &[&str] = &["host", "content-length"];

/// Connection settings for the HTTP client.
///
/// Without a total timeout a stalled token exchange would block its caller
/// indefinitely, so both values are always set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

/// Outbound proxy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub kind: ProxyKind,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    #[default]
    Http,
    Socks,
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            timeout_ms: default_timeout_ms(),
            proxy: None,
        }
    }
}

impl ProxyConfig {
    pub fn url(&self) -> String {
        let scheme = match self.kind {
            ProxyKind::Http => "http",
            ProxyKind::Socks => "socks5",
        };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

/// Production transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.timeout_ms));

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.url()).map_err(|e| {
                TransportError::Client(format!("invalid proxy {}: {e}", proxy.url()))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Client(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a AipRequest,
    ) -> Pin<Box<dyn Future<Output = Result<AipResponse>> + Send + 'a>> {
        Box::pin(async move {
            let url = request.full_url();
            let mut builder = self.client.request(request.method().clone(), url.clone());
            for (name, value) in request.headers() {
                if DERIVED_HEADERS.contains(&name.as_str()) {
                    continue;
                }
                builder = builder.header(name.as_str(), value.as_str());
            }

            let response = builder
                .body(request.body_string())
                .send()
                .await
                .map_err(|e| {
                    TransportError::Http(format!("{} {}: {e}", request.method(), request.url()))
                })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Http(format!("reading response body: {e}")))?;
            debug!(status, url = %request.url(), bytes = body.len(), "received response");

            Ok(AipResponse { status, body })
        })
    }
}
