//! Error types for the token exchange

/// Errors from the OAuth token exchange.
///
/// None of these reach API callers; the client folds every one of them into
/// Signal A = false.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("token request rejected ({code}): {message}")]
    Rejected { code: String, message: String },
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
