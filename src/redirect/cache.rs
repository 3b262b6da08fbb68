//! Per-scope caching of match outcomes.

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::matcher::{ensure_url, FirstMatch, RuleMatcher};
use super::result::MatchResult;
use super::rules::RedirectRule;
use super::scope::{CacheScope, CachedEntry};
use crate::config::CacheConfig;
use crate::error::{RerouterError, Result};

/// Default absolute lifetime of a cache snapshot, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 15 * 60;

/// Normalize a URL into its cache key.
pub fn cache_key(url: &str) -> String {
    url.to_uppercase()
}

/// Resolves URLs through a scope's cache, falling back to a [`RuleMatcher`]
/// on a miss.
///
/// Both positive and negative outcomes are cached. Each entry is served for
/// at most `ttl` after it was stored. The scope's snapshot deadline is set
/// to `now + ttl` when the first entry goes into an empty snapshot and is
/// never pushed back; once it passes the whole snapshot is dropped on the
/// next access. Rule changes do not invalidate anything, so a scope may
/// serve outcomes computed against older rules for up to one ttl.
pub struct MatchCache<M = FirstMatch> {
    matcher: M,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MatchCache<FirstMatch> {
    /// Create a cache with the standard matcher, a 15 minute ttl and the
    /// system clock.
    pub fn new() -> Self {
        Self::with_matcher(FirstMatch)
    }

    /// Create a cache with the standard matcher and the configured ttl.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new().with_ttl(config.ttl())
    }
}

impl Default for MatchCache<FirstMatch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RuleMatcher> MatchCache<M> {
    /// Create a cache around a custom matcher.
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            matcher,
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the snapshot lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The matcher consulted on a miss.
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// The snapshot lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve `url` within `scope`.
    ///
    /// Returns the cached outcome when present. Otherwise runs the matcher
    /// against `rules`, stores the outcome (including "no match") under the
    /// normalized URL and, if the snapshot was empty, fixes its deadline.
    /// The clock read, the lookup and the insert happen under one hold of
    /// the scope's lock.
    pub fn resolve(
        &self,
        scope: Option<&CacheScope>,
        url: &str,
        rules: &[RedirectRule],
    ) -> Result<Option<Arc<MatchResult>>> {
        let scope = scope
            .ok_or_else(|| RerouterError::InvalidArgument("cache scope is required".to_string()))?;
        ensure_url(url)?;

        let key = cache_key(url);

        trace!(scope = %scope.name(), key = %key, "Resolving URL");

        let mut state = scope.lock();
        let now = self.clock.now();

        if state.is_expired(now) {
            debug!(
                scope = %scope.name(),
                entries = state.entries.len(),
                "Match cache snapshot expired"
            );
            state.reset();
        }

        if let Some(entry) = state.entries.get(&key) {
            if entry.is_fresh(now, self.ttl) {
                debug!(
                    scope = %scope.name(),
                    key = %key,
                    redirect = entry.outcome.is_some(),
                    "Match cache hit"
                );
                return Ok(entry.outcome.clone());
            }
            debug!(scope = %scope.name(), key = %key, "Match cache entry expired");
        }

        let outcome = self.matcher.find_match(url, rules)?.map(Arc::new);

        debug!(
            scope = %scope.name(),
            key = %key,
            redirect = outcome.is_some(),
            "Match cache miss, storing outcome"
        );

        let first_entry = state.entries.is_empty();
        Arc::make_mut(&mut state.entries).insert(
            key,
            CachedEntry {
                inserted_at: now,
                outcome: outcome.clone(),
            },
        );
        if first_entry {
            state.expires_at = now.checked_add_signed(self.ttl);
        }

        Ok(outcome)
    }
}
