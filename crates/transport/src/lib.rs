//! HTTP seam between the auth subsystem and the network
//!
//! Defines the request/response model every API call and the OAuth token
//! exchange travel through, and the `Transport` trait that moves them over
//! the wire. `ReqwestTransport` is the production implementation; tests
//! substitute scripted transports behind the same trait object.

pub mod http;
pub mod request;

pub use http::{HttpConfig, ProxyConfig, ProxyKind, ReqwestTransport};
pub use request::{AipRequest, AipResponse, BodyFormat};
pub use reqwest::{Method, Url};

use std::future::Future;
use std::pin::Pin;

/// Errors raised before any HTTP response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Sends one fully prepared request and returns the raw response.
///
/// Any HTTP status counts as a response; only failures to get one at all
/// (DNS, connect, timeout) are errors. Uses `Pin<Box<dyn Future>>` so it
/// can be shared as `Arc<dyn Transport>`.
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: &'a AipRequest,
    ) -> Pin<Box<dyn Future<Output = Result<AipResponse>> + Send + 'a>>;
}
