//! Auth-mode state machine
//!
//! Pure transition table: `advance(mode, signal) -> mode`, no I/O. The
//! client holds one `AuthMode` behind its lock and feeds it three signals
//! over its lifetime:
//!
//! - Signal A (at `Unknown`): the OAuth exchange returned a token
//! - Signal B (at `OAuthAccepted`): the granted scopes include a required one
//! - Signal C (at `SuspectedAccessKeyUser`): the first signed call was *not*
//!   rejected with the IAM error code
//!
//! Transitions:
//! - Unknown → OAuthAccepted (A) | ConfirmedAccessKeyUser (!A)
//! - OAuthAccepted → ConfirmedOAuthUser (B) | SuspectedAccessKeyUser (!B)
//! - SuspectedAccessKeyUser → ConfirmedAccessKeyUser (C) | ConfirmedOAuthUser (!C)
//! - ConfirmedOAuthUser, ConfirmedAccessKeyUser → themselves (terminal)

/// Which kind of credential the client believes it holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthMode {
    #[default]
    Unknown,
    OAuthAccepted,
    ConfirmedOAuthUser,
    SuspectedAccessKeyUser,
    ConfirmedAccessKeyUser,
}

/// How an outbound request is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStrategy {
    /// `access_token` query parameter
    BearerToken,
    /// BCE-Auth-V1 `Authorization` header
    AccessKeySignature,
}

/// Apply one signal. Terminal modes ignore every signal.
pub fn advance(mode: AuthMode, signal: bool) -> AuthMode {
    use AuthMode::*;

    match (mode, signal) {
        (Unknown, true) => OAuthAccepted,
        (Unknown, false) => ConfirmedAccessKeyUser,
        (OAuthAccepted, true) => ConfirmedOAuthUser,
        (OAuthAccepted, false) => SuspectedAccessKeyUser,
        (SuspectedAccessKeyUser, true) => ConfirmedAccessKeyUser,
        (SuspectedAccessKeyUser, false) => ConfirmedOAuthUser,
        (terminal @ (ConfirmedOAuthUser | ConfirmedAccessKeyUser), _) => terminal,
    }
}

impl AuthMode {
    pub fn advance(self, signal: bool) -> Self {
        advance(self, signal)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AuthMode::ConfirmedOAuthUser | AuthMode::ConfirmedAccessKeyUser
        )
    }

    /// The client-visible "is this a cloud access key" flag.
    ///
    /// True while suspected as well, so the speculative signed call uses
    /// the access-key path.
    pub fn is_access_key_user(self) -> bool {
        matches!(
            self,
            AuthMode::SuspectedAccessKeyUser | AuthMode::ConfirmedAccessKeyUser
        )
    }

    /// Whether the OAuth token lifecycle applies in this mode.
    pub fn needs_token(self) -> bool {
        !self.is_access_key_user()
    }

    pub fn strategy(self) -> SigningStrategy {
        if self.is_access_key_user() {
            SigningStrategy::AccessKeySignature
        } else {
            SigningStrategy::BearerToken
        }
    }

    /// Label for logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            AuthMode::Unknown => "unknown",
            AuthMode::OAuthAccepted => "oauth_accepted",
            AuthMode::ConfirmedOAuthUser => "oauth_user",
            AuthMode::SuspectedAccessKeyUser => "suspected_access_key_user",
            AuthMode::ConfirmedAccessKeyUser => "access_key_user",
        }
    }
}
