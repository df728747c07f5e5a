//! Bearer token cache with an early-refresh margin
//!
//! Holds at most one token per client. A token is treated as stale a full
//! day (`REFRESH_MARGIN_SECS`) before its real expiry, so long calls and
//! clock skew never see a token that dies mid-flight.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use common::Secret;

use crate::constants::REFRESH_MARGIN_SECS;

/// Token, expiry and granted scopes of the most recent successful exchange.
///
/// Starts empty. Only `store` mutates it; callers serialize access through
/// the client's lock.
#[derive(Debug, Default)]
pub struct TokenCache {
    token: Option<Secret<String>>,
    expires_at: Option<DateTime<Utc>>,
    scopes: BTreeSet<String>,
}

/// Point-in-time copy of the cache contents.
#[derive(Debug, Clone, Default)]
pub struct TokenSnapshot {
    pub token: Option<Secret<String>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scopes: BTreeSet<String>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if there is no token, or it expires within the refresh margin.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Utc::now())
    }

    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expires_at) {
            (Some(_), Some(expires_at)) => {
                now + Duration::seconds(REFRESH_MARGIN_SECS) > expires_at
            }
            _ => true,
        }
    }

    /// Replace the cached token. `expires_in` is a delta in seconds.
    pub fn store<I, S>(&mut self, token: impl Into<Secret<String>>, expires_in: u64, scopes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_at(Utc::now(), token, expires_in, scopes);
    }

    pub fn store_at<I, S>(
        &mut self,
        now: DateTime<Utc>,
        token: impl Into<Secret<String>>,
        expires_in: u64,
        scopes: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Absurd expires_in values saturate instead of overflowing.
        let expires_at = i64::try_from(expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.token = Some(token.into());
        self.expires_at = Some(expires_at);
        self.scopes = scopes.into_iter().map(Into::into).collect();
    }

    pub fn token(&self) -> Option<&Secret<String>> {
        self.token.as_ref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    pub fn read(&self) -> TokenSnapshot {
        TokenSnapshot {
            token: self.token.clone(),
            expires_at: self.expires_at,
            scopes: self.scopes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn cache_expiring_in(delta: Duration) -> TokenCache {
        let mut cache = TokenCache::new();
        cache.store_at(now(), "T", delta.num_seconds() as u64, ["brain_all_scope"]);
        cache
    }

    #[test]
    fn empty_cache_needs_refresh() {
        assert!(TokenCache::new().needs_refresh());
        assert!(TokenCache::new().needs_refresh_at(now()));
    }

    #[test]
    fn token_inside_margin_needs_refresh() {
        let cache = cache_expiring_in(Duration::hours(23) + Duration::minutes(59));
        assert!(cache.needs_refresh_at(now()));
    }

    #[test]
    fn token_outside_margin_is_fresh() {
        let cache = cache_expiring_in(Duration::hours(25));
        assert!(!cache.needs_refresh_at(now()));
    }

    #[test]
    fn exact_margin_is_still_fresh() {
        let cache = cache_expiring_in(Duration::hours(24));
        assert!(!cache.needs_refresh_at(now()));
        assert!(cache.needs_refresh_at(now() + Duration::seconds(1)));
    }

    #[test]
    fn store_replaces_token_and_scopes() {
        let mut cache = TokenCache::new();
        cache.store_at(now(), "first", 2_592_000, ["a", "b"]);
        cache.store_at(now(), "second", 2_592_000, ["c"]);

        let snapshot = cache.read();
        assert_eq!(snapshot.token.unwrap().expose_str(), "second");
        assert_eq!(snapshot.scopes.into_iter().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(
            snapshot.expires_at,
            Some(now() + Duration::seconds(2_592_000))
        );
    }

    #[test]
    fn huge_expiry_saturates() {
        let mut cache = TokenCache::new();
        cache.store_at(now(), "T", u64::MAX, Vec::<String>::new());
        assert_eq!(cache.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(!cache.needs_refresh_at(now()));
    }

    #[test]
    fn zero_expiry_is_immediately_stale() {
        let mut cache = TokenCache::new();
        cache.store_at(now(), "T", 0, ["brain_all_scope"]);
        assert!(cache.needs_refresh_at(now()));
        assert!(cache.token().is_some());
    }

    #[test]
    fn debug_output_redacts_token() {
        let cache = cache_expiring_in(Duration::days(30));
        let debug = format!("{cache:?}");
        assert!(!debug.contains("\"T\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
