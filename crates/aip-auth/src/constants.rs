//! Fixed protocol values
//!
//! These are part of the wire contract with the gateway, not tunables.
//! The required scope list is the default for `ClientConfig` and can be
//! overridden per client.

/// OAuth token endpoint for the client-credentials exchange
pub const OAUTH_URL: &str = "https://aip.baidubce.com/oauth/2.0/token";

/// Granted scopes that prove a key is a developer API key for this SDK.
pub const DEFAULT_REQUIRED_SCOPES: &[&str] = &[
    "audio_voice_assistant_get",
    "audio_tts_post",
    "brain_all_scope",
];

/// `error_code` the gateway returns when an access key has no IAM grant.
pub const IAM_ERROR_CODE: i64 = 14;

/// Query parameter carrying the bearer token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Query parameter identifying the SDK flavour, sent on every call.
pub const SDK_IDENTIFIER_PARAM: &str = "aipSdk";

pub const SDK_IDENTIFIER: &str = "rust";

/// Tokens are renewed this long before they actually expire.
pub const REFRESH_MARGIN_SECS: i64 = 24 * 60 * 60;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
