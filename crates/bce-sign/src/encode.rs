//! URI encoding used by canonicalization and form bodies

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::{Error, Result};

/// Everything except the RFC 3986 unreserved set `[A-Za-z0-9._~-]`.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode `value` byte-wise (UTF-8) with uppercase hex digits.
///
/// With `encode_slash = false` every `%2F` is turned back into `/`, which is
/// how the canonical URI keeps its path separators.
pub fn uri_encode(value: &str, encode_slash: bool) -> String {
    let encoded = utf8_percent_encode(value, UNRESERVED).to_string();
    if encode_slash {
        encoded
    } else {
        encoded.replace("%2F", "/")
    }
}

/// Undo the percent-encoding a parsed URL applies to its path.
///
/// The canonical URI is built from the raw path; feeding it an already
/// encoded one would turn every `%` into `%25`.
pub fn decode_path(path: &str) -> Result<String> {
    percent_decode_str(path)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Error::Path(format!("{path}: {e}")))
}
