//! Rerouter - Request-time URL Redirect Resolution
//!
//! This crate decides whether an incoming URL should be redirected. Rules are
//! evaluated in the order supplied and the first matching pattern wins; its
//! replacement template is expanded from the pattern's captures to build the
//! target. Outcomes, including "no redirect", are cached per scope (a session
//! or the whole process) under an absolute expiry so repeated requests skip
//! rule evaluation.
//!
//! ```rust
//! use std::sync::Arc;
//! use rerouter::redirect::{CacheScope, MatchCache, RedirectKind, RedirectRule};
//!
//! # fn main() -> rerouter::error::Result<()> {
//! let rules = vec![RedirectRule::new("^/old/(.*)$", "/new/$1", RedirectKind::Permanent)?];
//! let cache = Arc::new(MatchCache::new());
//! let scope = CacheScope::new();
//!
//! let result = cache.resolve(Some(&scope), "/old/page", &rules)?.expect("rule matches");
//! assert_eq!(result.redirect_target(), "/new/page");
//! assert_eq!(result.status_code(), 301);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod redirect;
