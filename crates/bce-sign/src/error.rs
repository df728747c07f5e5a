//! Error types for request signing

/// Errors from signature computation.
///
/// A request whose signature failed must not be transmitted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HMAC-SHA256 signature failed: {0}")]
    Hmac(String),

    #[error("request path is not valid UTF-8 once decoded: {0}")]
    Path(String),
}

/// Result alias for signing operations.
pub type Result<T> = std::result::Result<T, Error>;
