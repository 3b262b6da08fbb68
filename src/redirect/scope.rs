//! Cache scopes.
//!
//! A scope owns one cache snapshot: a map from normalized URL to match
//! outcome and insertion time, plus the absolute time at which the whole
//! snapshot lapses. The snapshot deadline is fixed when the first entry goes
//! into an empty snapshot, so no entry outlives one window. Each scope
//! carries its own lock, so independent scopes (one per session, or a single
//! process-wide scope) never contend with each other.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::result::MatchResult;

/// A cached outcome and when it was stored. A `None` outcome records a
/// known miss.
#[derive(Debug, Clone)]
pub(crate) struct CachedEntry {
    pub(crate) inserted_at: DateTime<Utc>,
    pub(crate) outcome: Option<Arc<MatchResult>>,
}

impl CachedEntry {
    pub(crate) fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.inserted_at) < ttl
    }
}

/// Cached outcomes keyed by normalized URL.
pub(crate) type Entries = HashMap<String, CachedEntry>;

/// Mutable state behind a scope's lock.
#[derive(Debug, Default)]
pub(crate) struct ScopeState {
    pub(crate) entries: Arc<Entries>,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl ScopeState {
    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if now >= at)
    }

    pub(crate) fn reset(&mut self) {
        self.entries = Arc::new(HashMap::new());
        self.expires_at = None;
    }
}

/// One isolated match cache.
#[derive(Debug)]
pub struct CacheScope {
    name: String,
    state: Mutex<ScopeState>,
}

impl CacheScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::named("default")
    }

    /// Create an empty scope labelled `name` in log output.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(ScopeState::default()),
        }
    }

    /// The scope's label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of outcomes currently held, including a lapsed snapshot that
    /// has not been discarded yet.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns `true` if the scope holds no outcomes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the current snapshot lapses, if it holds anything.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().expires_at
    }

    /// Drop every cached outcome.
    pub fn clear(&self) {
        debug!(scope = %self.name, "Clearing match cache scope");
        self.state.lock().reset();
    }

    /// A point-in-time, read-only view of the cache.
    ///
    /// The view is unaffected by later inserts; those go to a fresh copy.
    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.state.lock();
        CacheSnapshot {
            entries: Arc::clone(&state.entries),
            expires_at: state.expires_at,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ScopeState> {
        self.state.lock()
    }
}

impl Default for CacheScope {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only copy of a scope's cache at one moment.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    entries: Arc<Entries>,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    /// Look up a normalized key.
    ///
    /// `None` means the key was never resolved; `Some(None)` means it was
    /// resolved and no rule matched.
    pub fn get(&self, key: &str) -> Option<Option<&Arc<MatchResult>>> {
        self.entries.get(key).map(|entry| entry.outcome.as_ref())
    }

    /// When the outcome for a normalized key was stored.
    pub fn inserted_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|entry| entry.inserted_at)
    }

    /// Number of outcomes in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The normalized keys held.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// When the snapshot lapses.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Scopes keyed by a host-defined session id.
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: DashMap<String, Arc<CacheScope>>,
}

impl ScopeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the scope for `session`, creating it on first use.
    pub fn scope(&self, session: &str) -> Arc<CacheScope> {
        if let Some(scope) = self.scopes.get(session) {
            return Arc::clone(scope.value());
        }

        let scope = self
            .scopes
            .entry(session.to_string())
            .or_insert_with(|| {
                debug!(session = %session, "Creating match cache scope");
                Arc::new(CacheScope::named(session))
            });
        Arc::clone(scope.value())
    }

    /// Get the scope for `session` without creating one.
    pub fn get(&self, session: &str) -> Option<Arc<CacheScope>> {
        self.scopes.get(session).map(|s| Arc::clone(s.value()))
    }

    /// End a session, discarding its cache.
    pub fn remove(&self, session: &str) -> Option<Arc<CacheScope>> {
        let removed = self.scopes.remove(session).map(|(_, scope)| scope);
        if removed.is_some() {
            debug!(session = %session, "Removed match cache scope");
        }
        removed
    }

    /// Number of live scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` if no scopes exist.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
