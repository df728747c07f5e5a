//! The key pair a client is constructed with

use common::Secret;

/// Immutable client credential.
///
/// `api_key`/`api_secret` double as access key / secret key when the pair
/// turns out to be a cloud access key.
#[derive(Debug, Clone)]
pub struct Credential {
    app_id: String,
    api_key: String,
    api_secret: Secret<String>,
}

impl Credential {
    pub fn new(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<Secret<String>>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &Secret<String> {
        &self.api_secret
    }
}
