//! Per-client authentication hooks
//!
//! `Authenticator` owns the only mutable auth state of a client: the
//! current `AuthMode` and the `TokenCache`. Both live behind one
//! `tokio::sync::Mutex`, and the token refresh runs while holding it, so
//! concurrent calls never exchange twice or race on a transition.

use std::sync::Arc;

use aip_auth::{
    ACCESS_TOKEN_PARAM, AuthMode, Credential, SDK_IDENTIFIER, SDK_IDENTIFIER_PARAM,
    SigningStrategy, TokenCache, TokenSnapshot, advance, is_iam_rejection, scopes_grant_access,
};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use transport::{AipRequest, AipResponse, Transport, Url};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::telemetry;

#[derive(Debug, Default)]
struct AuthState {
    mode: AuthMode,
    cache: TokenCache,
}

/// How one attempt was authenticated, handed back to `after_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedAuth {
    strategy: SigningStrategy,
    mode: AuthMode,
}

impl AppliedAuth {
    pub fn strategy(&self) -> SigningStrategy {
        self.strategy
    }

    /// Mode in effect when the attempt was prepared
    pub fn mode(&self) -> AuthMode {
        self.mode
    }
}

/// What the caller should do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    /// Hand the response to the caller
    Accept,
    /// The signed attempt was IAM-rejected and the key turned out to be a
    /// developer key; send the same call again over the bearer-token path
    Replay,
}

pub struct Authenticator {
    credential: Credential,
    token_url: Url,
    required_scopes: Vec<String>,
    transport: Arc<dyn Transport>,
    state: Mutex<AuthState>,
}

impl Authenticator {
    pub fn new(
        credential: Credential,
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            credential,
            token_url: config.token_url()?,
            required_scopes: config.required_scopes.clone(),
            transport,
            state: Mutex::new(AuthState::default()),
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub async fn mode(&self) -> AuthMode {
        self.state.lock().await.mode
    }

    pub async fn is_access_key_user(&self) -> bool {
        self.mode().await.is_access_key_user()
    }

    pub async fn token(&self) -> TokenSnapshot {
        self.state.lock().await.cache.read()
    }

    /// Refresh the bearer token if the current mode uses one and it is due.
    ///
    /// Exchange failures are never returned: they are Signal A = false.
    pub async fn before_request(&self) {
        let mut state = self.state.lock().await;
        if !state.mode.needs_token() || !state.cache.needs_refresh() {
            return;
        }

        let app_id = self.credential.app_id();
        debug!(app_id, mode = state.mode.label(), "requesting access token");

        let result = aip_auth::exchange(
            self.transport.as_ref(),
            &self.token_url,
            self.credential.api_key(),
            self.credential.api_secret().expose_str(),
        )
        .await;

        match result {
            Ok(grant) => {
                telemetry::record_exchange(true);
                let has_scope = scopes_grant_access(&grant.scopes, &self.required_scopes);
                info!(app_id, expires_in = grant.expires_in, has_scope, "access token granted");

                // Kept on a scope mismatch too: a replay after an IAM
                // rejection needs it.
                state
                    .cache
                    .store(grant.access_token, grant.expires_in, grant.scopes);

                if state.mode == AuthMode::Unknown {
                    self.feed(&mut state, true);
                }
                if state.mode == AuthMode::OAuthAccepted {
                    self.feed(&mut state, has_scope);
                }
            }
            Err(e) => {
                telemetry::record_exchange(false);
                warn!(app_id, error = %e, "access token exchange failed");
                if state.mode == AuthMode::Unknown {
                    self.feed(&mut state, false);
                }
            }
        }
    }

    /// Authenticate one attempt according to the current mode.
    pub async fn attach_auth(&self, request: &mut AipRequest) -> Result<AppliedAuth> {
        let (mode, token) = {
            let state = self.state.lock().await;
            (state.mode, state.cache.token().cloned())
        };

        request.add_param(SDK_IDENTIFIER_PARAM, SDK_IDENTIFIER);
        let strategy = mode.strategy();
        match strategy {
            SigningStrategy::BearerToken => {
                let token = token.ok_or(Error::MissingToken)?;
                request.add_param(ACCESS_TOKEN_PARAM, token.expose_str());
            }
            SigningStrategy::AccessKeySignature => {
                sign_request(request, &self.credential, Utc::now())?;
            }
        }

        Ok(AppliedAuth { strategy, mode })
    }

    /// Feed the outcome of a signed attempt back into the mode machine.
    ///
    /// Only a 200 response with a JSON body counts as an outcome. Returns
    /// `Replay` when the attempt was IAM-rejected and the client has
    /// settled on the developer-key path, whichever concurrent call made
    /// that transition.
    pub async fn after_response(
        &self,
        applied: &AppliedAuth,
        response: &AipResponse,
    ) -> ResponseAction {
        if applied.strategy != SigningStrategy::AccessKeySignature
            || !response.is_success()
            || response.json().is_none()
        {
            return ResponseAction::Accept;
        }

        let rejected = is_iam_rejection(&response.body);
        let mut state = self.state.lock().await;
        if state.mode == AuthMode::SuspectedAccessKeyUser {
            self.feed(&mut state, !rejected);
        }

        if rejected && state.mode == AuthMode::ConfirmedOAuthUser {
            debug!(
                app_id = self.credential.app_id(),
                "signed call rejected by IAM, replaying with token"
            );
            ResponseAction::Replay
        } else {
            ResponseAction::Accept
        }
    }

    fn feed(&self, state: &mut AuthState, signal: bool) {
        let from = state.mode;
        let to = advance(from, signal);
        if to == from {
            return;
        }
        state.mode = to;
        telemetry::record_transition(to);
        info!(
            app_id = self.credential.app_id(),
            from = from.label(),
            to = to.label(),
            signal,
            "auth mode changed"
        );
    }
}

/// Add the BCE-Auth-V1 headers for a request signed at `now`.
///
/// Sets `Content-Length`, `Content-MD5`, `Host` and `x-bce-date` first,
/// since the signature covers them.
pub fn sign_request(
    request: &mut AipRequest,
    credential: &Credential,
    now: DateTime<Utc>,
) -> Result<()> {
    let body = request.body_string();
    let host = request.host();
    let path = bce_sign::decode_path(request.path())?;
    let timestamp = bce_sign::bce_timestamp(now);

    request.add_header("content-length", body.len().to_string());
    request.add_header("content-md5", bce_sign::content_md5(&body));
    request.add_header("host", host);
    request.add_header("x-bce-date", timestamp.as_str());

    let authorization = bce_sign::sign(
        request.method().as_str(),
        &path,
        request.params(),
        request.headers(),
        credential.api_key(),
        credential.api_secret().expose_str(),
        &timestamp,
    )?;
    request.add_header("authorization", authorization);
    Ok(())
}
