//! Client errors and the general-error object they render to

use serde_json::{Value, json};
use transport::TransportError;

/// Error code for calls that produced no usable HTTP response.
pub const NET_ERROR_CODE: &str = "SDK108";
pub const NET_ERROR_MSG: &str = "connection or read data time out";

/// Numeric code for bodies that are not JSON and for local failures.
pub const GENERAL_ERROR_CODE: i64 = -1;

/// Errors surfaced by `AipClient::call`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request signing failed: {0}")]
    Sign(#[from] bce_sign::Error),

    #[error("call failed with HTTP status {status}")]
    Network { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("response is not JSON: {0}")]
    InvalidResponse(String),

    #[error("no bearer token available")]
    MissingToken,

    #[error("invalid client configuration: {0}")]
    Config(#[from] common::Error),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// `error_code` of the general-error object.
    pub fn code(&self) -> Value {
        match self {
            Error::Network { .. } | Error::Transport(_) => Value::from(NET_ERROR_CODE),
            Error::Sign(_)
            | Error::InvalidResponse(_)
            | Error::MissingToken
            | Error::Config(_) => Value::from(GENERAL_ERROR_CODE),
        }
    }

    /// `error_msg` of the general-error object.
    pub fn message(&self) -> String {
        match self {
            Error::Network { .. } | Error::Transport(_) => NET_ERROR_MSG.to_string(),
            Error::InvalidResponse(body) => body.clone(),
            other => other.to_string(),
        }
    }

    /// `{"error_code": .., "error_msg": ..}`, the same shape in both auth modes.
    pub fn to_json(&self) -> Value {
        json!({
            "error_code": self.code(),
            "error_msg": self.message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_share_the_timeout_shape() {
        let status = Error::Network {
            status: 502,
            body: "bad gateway".into(),
        };
        let transport = Error::Transport(TransportError::Http("connect refused".into()));
        for err in [status, transport] {
            assert_eq!(
                err.to_json(),
                json!({"error_code": "SDK108", "error_msg": "connection or read data time out"})
            );
        }
    }

    #[test]
    fn unparsable_body_is_echoed_with_minus_one() {
        let err = Error::InvalidResponse("<html>oops</html>".into());
        assert_eq!(
            err.to_json(),
            json!({"error_code": -1, "error_msg": "<html>oops</html>"})
        );
    }

    #[test]
    fn local_failures_carry_their_description() {
        let err = Error::MissingToken;
        assert_eq!(err.code(), json!(-1));
        assert_eq!(err.message(), "no bearer token available");

        let err = Error::Config(common::Error::Config("token_url is empty".into()));
        assert!(err.message().contains("token_url is empty"));
    }
}
