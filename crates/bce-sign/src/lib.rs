//! BCE-Auth-V1 request signing
//!
//! Pure functions that turn an outbound request (method, path, query
//! parameters, headers) plus an access key / secret key pair into the value
//! of the `Authorization` header the cloud gateway verifies. Nothing in this
//! crate performs I/O or holds state.
//!
//! Signing flow:
//! 1. `authStringPrefix = bce-auth-v1/{ak}/{timestamp}/1800`
//! 2. `signingKey = hex(HMAC-SHA256(sk, authStringPrefix))`
//! 3. `CanonicalRequest::new()` canonicalizes URI, query and headers
//! 4. `signature = hex(HMAC-SHA256(signingKey, canonicalRequest))`
//! 5. header value is `{authStringPrefix}//{signature}`

pub mod canonical;
pub mod encode;
pub mod error;
pub mod signer;

pub use canonical::{CanonicalRequest, canonical_headers, canonical_query, canonical_uri};
pub use encode::{decode_path, uri_encode};
pub use error::{Error, Result};
pub use signer::{
    AUTH_VERSION, EXPIRATION_SECONDS, auth_string_prefix, bce_timestamp, content_md5,
    hmac_sha256_hex, sign,
};
