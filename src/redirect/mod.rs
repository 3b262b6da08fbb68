//! Redirect rule evaluation and match caching.

mod cache;
mod clock;
mod matcher;
mod result;
mod rules;
mod scope;

pub use cache::{cache_key, MatchCache, DEFAULT_TTL_SECS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use matcher::{FirstMatch, RuleMatcher};
pub use result::MatchResult;
pub use rules::{RedirectKind, RedirectRule};
pub use scope::{CacheScope, CacheSnapshot, ScopeRegistry};
