//! Scripted gateway for exercising the auth flow without a network

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use transport::{AipRequest, AipResponse, Transport, TransportError};

const TOKEN_PATH: &str = "/oauth/2.0/token";

pub(crate) enum TokenReply {
    /// HTTP 200 with this body
    Grant(String),
    Status(u16, &'static str),
    Unreachable,
}

pub(crate) const IAM_REJECTED: &str = r#"{"error_code":14,"error_msg":"IAM Certification failed"}"#;

type ApiHandler = Box<dyn Fn(&AipRequest) -> AipResponse + Send + Sync>;

/// Answers the token endpoint from a script of replies, one per exchange
/// with the last one repeating, and every other path from an API handler.
/// Counts exchanges and records API requests.
pub(crate) struct FakeGateway {
    token: Vec<TokenReply>,
    api: ApiHandler,
    exchange_delay: Duration,
    exchanges: AtomicUsize,
    calls: Mutex<Vec<AipRequest>>,
}

impl FakeGateway {
    pub(crate) fn new(token: TokenReply) -> Self {
        Self::scripted(vec![token])
    }

    pub(crate) fn scripted(token: Vec<TokenReply>) -> Self {
        assert!(!token.is_empty(), "token script needs at least one reply");
        Self {
            token,
            api: Box::new(|_| AipResponse::new(200, r#"{"log_id":1,"result":"ok"}"#)),
            exchange_delay: Duration::ZERO,
            exchanges: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_api(
        mut self,
        handler: impl Fn(&AipRequest) -> AipResponse + Send + Sync + 'static,
    ) -> Self {
        self.api = Box::new(handler);
        self
    }

    pub(crate) fn with_exchange_delay(mut self, delay: Duration) -> Self {
        self.exchange_delay = delay;
        self
    }

    pub(crate) fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<AipRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for FakeGateway {
    fn send<'a>(
        &'a self,
        request: &'a AipRequest,
    ) -> Pin<Box<dyn Future<Output = transport::Result<AipResponse>> + Send + 'a>> {
        Box::pin(async move {
            if request.path() == TOKEN_PATH {
                let turn = self.exchanges.fetch_add(1, Ordering::SeqCst);
                if !self.exchange_delay.is_zero() {
                    tokio::time::sleep(self.exchange_delay).await;
                }
                let reply = &self.token[turn.min(self.token.len() - 1)];
                return match reply {
                    TokenReply::Grant(body) => Ok(AipResponse::new(200, body.as_str())),
                    TokenReply::Status(status, body) => Ok(AipResponse::new(*status, *body)),
                    TokenReply::Unreachable => {
                        Err(TransportError::Http("connection refused".into()))
                    }
                };
            }

            let response = (self.api)(request);
            self.calls.lock().unwrap().push(request.clone());
            Ok(response)
        })
    }
}

pub(crate) fn token_body(token: &str, expires_in: u64, scope: &str) -> String {
    serde_json::json!({
        "access_token": token,
        "expires_in": expires_in,
        "scope": scope,
    })
    .to_string()
}

pub(crate) fn is_signed(request: &AipRequest) -> bool {
    request.header("authorization").is_some()
}

/// `{"error_code":14}` for signed requests, success for bearer requests.
pub(crate) fn iam_rejects_signatures(request: &AipRequest) -> AipResponse {
    if is_signed(request) {
        AipResponse::new(200, IAM_REJECTED)
    } else {
        AipResponse::new(200, r#"{"log_id":2,"person_num":1}"#)
    }
}
