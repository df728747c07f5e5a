//! OAuth client-credentials exchange
//!
//! One form POST to the token endpoint:
//! `grant_type=client_credentials&client_id={api_key}&client_secret={api_secret}`.
//!
//! Every failure, transport or server side, comes back as an `Error`. The
//! caller folds all of them into Signal A = false.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use transport::{AipRequest, Transport, Url};

use crate::constants::FORM_CONTENT_TYPE;
use crate::error::{Error, Result};

/// A successfully issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// Seconds until expiry, relative to the response time
    pub expires_in: u64,
    pub scopes: Vec<String>,
}

/// Raw token endpoint payload. Both the success and the error shapes are
/// optional here so one parse can tell them apart.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<Value>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    error_code: Option<Value>,
    error_msg: Option<String>,
}

/// Trade an API key pair for a bearer token.
pub async fn exchange(
    transport: &dyn Transport,
    token_url: &Url,
    api_key: &str,
    api_secret: &str,
) -> Result<TokenGrant> {
    let mut request = AipRequest::post(token_url.clone());
    request.add_header("content-type", FORM_CONTENT_TYPE);
    request.add_body("grant_type", "client_credentials");
    request.add_body("client_id", api_key);
    request.add_body("client_secret", api_secret);

    let response = transport
        .send(&request)
        .await
        .map_err(|e| Error::Http(format!("token request failed: {e}")))?;
    debug!(status = response.status, url = %token_url, "token endpoint responded");

    if !response.is_success() {
        return Err(Error::Rejected {
            code: response.status.to_string(),
            message: format!("Server response code: {}", response.status),
        });
    }

    parse_token_response(&response.body)
}

/// Parse a 200 response body from the token endpoint.
pub fn parse_token_response(body: &str) -> Result<TokenGrant> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))?;

    if let Some(code) = parsed.error_code {
        return Err(Error::Rejected {
            code: value_to_string(&code),
            message: parsed.error_msg.unwrap_or_default(),
        });
    }
    if let Some(error) = parsed.error {
        return Err(Error::Rejected {
            code: error,
            message: parsed.error_description.unwrap_or_default(),
        });
    }

    let access_token = parsed
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::TokenExchange("response has no access_token".into()))?;

    let expires_in = parsed
        .expires_in
        .as_ref()
        .and_then(parse_seconds)
        .ok_or_else(|| Error::TokenExchange("response has no valid expires_in".into()))?;

    let scopes = parsed
        .scope
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(TokenGrant {
        access_token,
        expires_in,
        scopes,
    })
}

fn parse_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport::{HttpConfig, ReqwestTransport};

    const GRANT: &str = concat!(
        r#"{"access_token":"24.abc","expires_in":2592000,"#,
        r#""scope":"public brain_all_scope wise_adapt","session_key":"x","refresh_token":"r"}"#,
    );

    #[test]
    fn parses_success_payload() {
        let grant = parse_token_response(GRANT).unwrap();
        assert_eq!(grant.access_token, "24.abc");
        assert_eq!(grant.expires_in, 2_592_000);
        assert_eq!(grant.scopes, vec!["public", "brain_all_scope", "wise_adapt"]);
    }

    #[test]
    fn missing_scope_means_no_scopes() {
        let grant = parse_token_response(r#"{"access_token":"T","expires_in":"3600"}"#).unwrap();
        assert_eq!(grant.expires_in, 3600);
        assert!(grant.scopes.is_empty());
    }

    #[test]
    fn oauth_error_shape_is_rejection() {
        let err = parse_token_response(
            r#"{"error":"invalid_client","error_description":"unknown client id"}"#,
        )
        .unwrap_err();
        match err {
            Error::Rejected { code, message } => {
                assert_eq!(code, "invalid_client");
                assert_eq!(message, "unknown client id");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn general_error_shape_is_rejection() {
        let err = parse_token_response(r#"{"error_code":110,"error_msg":"bad key"}"#).unwrap_err();
        assert!(matches!(err, Error::Rejected { ref code, .. } if code == "110"));
    }

    #[test]
    fn missing_fields_are_exchange_errors() {
        assert!(matches!(
            parse_token_response(r#"{"expires_in":3600}"#),
            Err(Error::TokenExchange(_))
        ));
        assert!(matches!(
            parse_token_response(r#"{"access_token":"T"}"#),
            Err(Error::TokenExchange(_))
        ));
        assert!(matches!(
            parse_token_response("<html>"),
            Err(Error::TokenExchange(_))
        ));
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn exchange_posts_client_credentials_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/2.0/token")
            .match_header("content-type", FORM_CONTENT_TYPE)
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex("grant_type=client_credentials".into()),
                mockito::Matcher::Regex("client_id=key".into()),
                mockito::Matcher::Regex("client_secret=secret".into()),
            ]))
            .with_status(200)
            .with_body(GRANT)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/oauth/2.0/token", server.url())).unwrap();
        let grant = exchange(&transport(), &url, "key", "secret").await.unwrap();

        assert_eq!(grant.access_token, "24.abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exchange_maps_non_200_to_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth/2.0/token")
            .with_status(401)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/oauth/2.0/token", server.url())).unwrap();
        let err = exchange(&transport(), &url, "key", "secret").await.unwrap_err();
        match err {
            Error::Rejected { code, message } => {
                assert_eq!(code, "401");
                assert_eq!(message, "Server response code: 401");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn exchange_maps_empty_body_to_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth/2.0/token")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/oauth/2.0/token", server.url())).unwrap();
        let err = exchange(&transport(), &url, "key", "secret").await.unwrap_err();
        assert!(matches!(err, Error::Rejected { .. }));
    }

    #[tokio::test]
    async fn exchange_reports_unreachable_endpoint() {
        // Nothing listens on port 9 locally.
        let url = Url::parse("http://127.0.0.1:9/oauth/2.0/token").unwrap();
        let err = exchange(&transport(), &url, "key", "secret").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
