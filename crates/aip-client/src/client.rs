//! Call dispatch with replay on mode discovery

use std::sync::Arc;

use aip_auth::{Credential, FORM_CONTENT_TYPE};
use serde_json::Value;
use tracing::{info, warn};
use transport::{AipRequest, AipResponse, BodyFormat, ReqwestTransport, Transport, Url};

use crate::auth::{Authenticator, ResponseAction};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::telemetry;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Authenticated client shared by every endpoint wrapper.
///
/// Cheap to share behind an `Arc`; all calls on one client share its
/// auth mode and token.
pub struct AipClient {
    auth: Authenticator,
    transport: Arc<dyn Transport>,
}

impl AipClient {
    /// Client over a `reqwest` transport built from `config.http`.
    pub fn new(credential: Credential, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.http)?;
        Self::with_transport(credential, config, Arc::new(transport))
    }

    pub fn with_transport(
        credential: Credential,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let auth = Authenticator::new(credential, &config, Arc::clone(&transport))?;
        Ok(Self { auth, transport })
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    /// Form-encoded POST with the default headers every API call carries.
    pub fn request(url: Url) -> AipRequest {
        let mut request = AipRequest::post(url);
        request.add_header("content-type", FORM_CONTENT_TYPE);
        request.add_header("accept", "*/*");
        request
    }

    /// POST whose body fields are sent as one JSON object.
    pub fn json_request(url: Url) -> AipRequest {
        let mut request = Self::request(url);
        request.set_body_format(BodyFormat::Json);
        request.add_header("content-type", JSON_CONTENT_TYPE);
        request
    }

    /// Send one logical call and return the parsed JSON body.
    ///
    /// API-level errors (`error_code` in a 200 body) are returned as data.
    /// If a speculative signed attempt is IAM-rejected and the client
    /// settles on the bearer-token path, the call is sent once more.
    pub async fn call(&self, request: AipRequest) -> Result<Value> {
        let mut replayed = false;
        loop {
            self.auth.before_request().await;

            let mut attempt = request.clone();
            let applied = self.auth.attach_auth(&mut attempt).await?;
            let response = self.transport.send(&attempt).await?;

            match self.auth.after_response(&applied, &response).await {
                ResponseAction::Replay if !replayed => {
                    replayed = true;
                    telemetry::record_replay();
                    info!(
                        app_id = self.auth.credential().app_id(),
                        path = request.path(),
                        "replaying call with access token"
                    );
                }
                _ => return parse_response(response),
            }
        }
    }
}

fn parse_response(response: AipResponse) -> Result<Value> {
    if !response.is_success() {
        warn!(status = response.status, body = %response.body, "call failed");
        return Err(Error::Network {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|_| Error::InvalidResponse(response.body))
}
