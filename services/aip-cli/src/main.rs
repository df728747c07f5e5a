//! AIP call tool
//!
//! Issues one authenticated call and prints the JSON response:
//! 1. Parses `--config`, `--url`, `--json`, `--image` and `key=value` fields
//! 2. Loads the TOML config and resolves the API secret
//! 3. Builds an `AipClient`, which works out on its own whether the key
//!    pair is a developer API key or a cloud access key
//! 4. Prints the response, or the general-error object on failure
//!
//! Logs go to stderr as JSON so stdout carries only the result.

mod args;
mod config;
mod error;

use std::process::ExitCode;

use aip_client::AipClient;
use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::{AipRequest, Url};

use crate::args::Args;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(response) => {
            println!("{}", pretty(&response));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "call failed");
            println!("{}", pretty(&failure_json(&e)));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<Value> {
    let config_path = Config::resolve_path(args.config.as_deref());
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let credential = config.credential()?;

    info!(
        app_id = credential.app_id(),
        token_url = %config.client.token_url,
        timeout_ms = config.client.http.timeout_ms,
        "configuration loaded"
    );

    let client = AipClient::new(credential, config.client)?;
    let url = Url::parse(&args.url)
        .map_err(|e| error::Error::Usage(format!("invalid --url {}: {e}", args.url)))?;
    let request = build_request(url, &args)?;

    Ok(client.call(request).await?)
}

fn build_request(url: Url, args: &Args) -> error::Result<AipRequest> {
    let mut request = if args.json {
        AipClient::json_request(url)
    } else {
        AipClient::request(url)
    };
    request.extend_body(args.fields.iter().cloned());

    if let Some(path) = &args.image {
        let bytes = std::fs::read(path).map_err(|source| error::Error::ImageRead {
            path: path.clone(),
            source,
        })?;
        request.add_body("image", STANDARD.encode(bytes));
    }
    Ok(request)
}

/// General-error object for any failure, matching what the client renders.
fn failure_json(e: &anyhow::Error) -> Value {
    if let Some(err) = e.downcast_ref::<aip_client::Error>() {
        return err.to_json();
    }
    if let Some(err) = e.downcast_ref::<error::Error>() {
        return err.to_json();
    }
    json!({
        "error_code": -1,
        "error_msg": format!("{e:#}"),
    })
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
