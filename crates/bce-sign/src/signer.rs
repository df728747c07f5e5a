//! BCE-Auth-V1 signature computation

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::canonical::CanonicalRequest;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Version tag at the start of every authorization string.
pub const AUTH_VERSION: &str = "bce-auth-v1";

/// Validity window the signature claims, in seconds.
pub const EXPIRATION_SECONDS: u32 = 1800;

/// `bce-auth-v1/{access_key}/{timestamp}/1800`
pub fn auth_string_prefix(access_key: &str, timestamp: &str) -> String {
    format!("{AUTH_VERSION}/{access_key}/{timestamp}/{EXPIRATION_SECONDS}")
}

/// Sign one request and return the full `Authorization` header value.
///
/// The signed-headers slot between the prefix and the signature is left
/// empty (`prefix//signature`); the gateway accepts this form and relies on
/// its own allow-list of headers.
pub fn sign<'a, P, H>(
    method: &str,
    path: &str,
    params: P,
    headers: H,
    access_key: &str,
    secret_key: &str,
    timestamp: &str,
) -> Result<String>
where
    P: IntoIterator<Item = (&'a String, &'a String)>,
    H: IntoIterator<Item = (&'a String, &'a String)>,
{
    let prefix = auth_string_prefix(access_key, timestamp);
    let signing_key = hmac_sha256_hex(secret_key, &prefix)?;
    let canonical = CanonicalRequest::new(method, path, params, headers);
    let signature = hmac_sha256_hex(&signing_key, &canonical.to_string())?;
    Ok(format!("{prefix}//{signature}"))
}

/// Lowercase hex HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256_hex(key: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| Error::Hmac(format!("HMAC initialization failed: {e}")))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Lowercase hex MD5 of the UTF-8 body, sent as `Content-MD5`.
pub fn content_md5(body: &str) -> String {
    format!("{:x}", md5::compute(body.as_bytes()))
}

/// `x-bce-date` value: UTC, `yyyy-MM-ddTHH:mm:ssZ`, 24-hour clock.
pub fn bce_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
