//! Canonical request construction
//!
//! The gateway rebuilds the same four lines from what it receives and
//! compares signatures, so every rule here is part of the wire contract:
//! sort order, which headers are signed, and where `/` is encoded.

use std::collections::BTreeSet;
use std::fmt;

use crate::encode::uri_encode;

/// Query parameter that is never part of the canonical query string.
const AUTHORIZATION_PARAM: &str = "authorization";

/// Headers signed in addition to every `x-bce-*` header.
const SIGNED_HEADERS: &[&str] = &["host", "content-md5", "content-length", "content-type"];

/// Prefix of gateway-specific headers, all of which are signed.
const BCE_HEADER_PREFIX: &str = "x-bce-";

/// The four canonical lines of one outbound request.
///
/// Built fresh per call and consumed by the signer; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: String,
}

impl CanonicalRequest {
    pub fn new<'a, P, H>(method: &str, path: &str, params: P, headers: H) -> Self
    where
        P: IntoIterator<Item = (&'a String, &'a String)>,
        H: IntoIterator<Item = (&'a String, &'a String)>,
    {
        Self {
            method: method.to_string(),
            uri: canonical_uri(path),
            query: canonical_query(params),
            headers: canonical_headers(headers),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn headers(&self) -> &str {
        &self.headers
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}",
            self.method, self.uri, self.query, self.headers
        )
    }
}

/// Canonical URI: leading `/` guaranteed, path separators left unencoded.
pub fn canonical_uri(path: &str) -> String {
    if path.starts_with('/') {
        uri_encode(path, false)
    } else {
        uri_encode(&format!("/{path}"), false)
    }
}

/// Canonical query string: `key=value` pairs, sorted, joined with `&`.
///
/// A parameter named `authorization` (any case) is skipped.
pub fn canonical_query<'a, P>(params: P) -> String
where
    P: IntoIterator<Item = (&'a String, &'a String)>,
{
    let pairs: BTreeSet<String> = params
        .into_iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(AUTHORIZATION_PARAM))
        .map(|(key, value)| format!("{}={}", uri_encode(key, true), uri_encode(value, true)))
        .collect();
    join(pairs, "&")
}

/// Canonical headers: allow-listed `name:value` lines, sorted, joined with `\n`.
///
/// Names are trimmed and lower-cased, values trimmed, both URI encoded.
pub fn canonical_headers<'a, H>(headers: H) -> String
where
    H: IntoIterator<Item = (&'a String, &'a String)>,
{
    let lines: BTreeSet<String> = headers
        .into_iter()
        .filter_map(|(name, value)| {
            let name = name.trim().to_ascii_lowercase();
            is_signed_header(&name).then(|| {
                format!(
                    "{}:{}",
                    uri_encode(&name, true),
                    uri_encode(value.trim(), true)
                )
            })
        })
        .collect();
    join(lines, "\n")
}

fn is_signed_header(lower_name: &str) -> bool {
    lower_name.starts_with(BCE_HEADER_PREFIX) || SIGNED_HEADERS.contains(&lower_name)
}

fn join(items: BTreeSet<String>, separator: &str) -> String {
    items.into_iter().collect::<Vec<_>>().join(separator)
}
