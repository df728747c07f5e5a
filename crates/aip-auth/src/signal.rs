//! Turning observations into state-machine signals

use serde_json::Value;

use crate::constants::IAM_ERROR_CODE;

/// Signal B: at least one granted scope is one this SDK needs.
pub fn scopes_grant_access<G, R>(granted: &[G], required: &[R]) -> bool
where
    G: AsRef<str>,
    R: AsRef<str>,
{
    granted
        .iter()
        .any(|scope| required.iter().any(|r| r.as_ref() == scope.as_ref()))
}

/// True when a response body carries the IAM "no access" error code.
///
/// Signal C is the negation: anything else, success included, counts as
/// the access key having worked.
pub fn is_iam_rejection(body: &str) -> bool {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    match json.get("error_code") {
        Some(Value::Number(n)) => n.as_i64() == Some(IAM_ERROR_CODE),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok() == Some(IAM_ERROR_CODE),
        _ => false,
    }
}
