//! Counters for auth-mode discovery
//!
//! - `aip_oauth_exchanges_total` (counter): label `outcome` (`granted`, `rejected`)
//! - `aip_auth_mode_transitions_total` (counter): label `to`
//! - `aip_requests_replayed_total` (counter)
//!
//! No recorder is installed here; without one these calls are no-ops.

use aip_auth::AuthMode;

pub(crate) fn record_exchange(granted: bool) {
    let outcome = if granted { "granted" } else { "rejected" };
    metrics::counter!("aip_oauth_exchanges_total", "outcome" => outcome).increment(1);
}

pub(crate) fn record_transition(to: AuthMode) {
    metrics::counter!("aip_auth_mode_transitions_total", "to" => to.label()).increment(1);
}

pub(crate) fn record_replay() {
    metrics::counter!("aip_requests_replayed_total").increment(1);
}
