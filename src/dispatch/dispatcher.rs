//! Redirect dispatcher.

use std::sync::Arc;
use tracing::{info, instrument, trace, warn};

use super::sink::{ResponseSink, LOCATION_HEADER};
use crate::error::{RerouterError, Result};
use crate::redirect::{CacheScope, FirstMatch, MatchCache, RedirectRule, RuleMatcher};

/// What the dispatcher did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A redirect was written to the sink; the request is finished.
    Redirected {
        /// 301 or 302
        status: u16,
        /// Value written to the `Location` header
        location: String,
    },
    /// No rule applies; the host should continue processing the request.
    Continue,
}

impl DispatchOutcome {
    /// Returns `true` if a redirect was issued.
    pub fn is_redirect(&self) -> bool {
        matches!(self, DispatchOutcome::Redirected { .. })
    }
}

/// Resolves request URLs and issues redirects on a [`ResponseSink`].
pub struct RedirectDispatcher<M: RuleMatcher = FirstMatch> {
    cache: Arc<MatchCache<M>>,
}

impl<M: RuleMatcher> RedirectDispatcher<M> {
    /// Create a dispatcher over a shared match cache.
    pub fn new(cache: Arc<MatchCache<M>>) -> Self {
        Self { cache }
    }

    /// The match cache used for resolution.
    pub fn cache(&self) -> &MatchCache<M> {
        &self.cache
    }

    /// Handle one request.
    ///
    /// The URL is resolved through `scope`. Without a usable scope the
    /// matcher is consulted directly, since caching is only an optimization.
    /// When the outcome carries a redirect target the sink is cleared, given
    /// a 301 or 302 status and a `Location` header, and ended. The cache lock
    /// is never held while the sink is written.
    #[instrument(skip_all, fields(url = %url, rules = rules.len()))]
    pub fn dispatch<S: ResponseSink + ?Sized>(
        &self,
        scope: Option<&CacheScope>,
        url: &str,
        rules: &[RedirectRule],
        sink: &mut S,
    ) -> Result<DispatchOutcome> {
        let resolved = match self.cache.resolve(scope, url, rules) {
            Ok(resolved) => resolved,
            Err(RerouterError::InvalidArgument(reason)) if scope.is_none() => {
                warn!(reason = %reason, "Match cache unavailable, matching directly");
                self.cache.matcher().find_match(url, rules)?.map(Arc::new)
            }
            Err(e) => return Err(e),
        };

        let Some(result) = resolved.filter(|r| r.has_redirect()) else {
            trace!("No redirect for request");
            return Ok(DispatchOutcome::Continue);
        };

        let status = result.status_code();
        let location = result.redirect_target().to_string();

        sink.clear();
        sink.set_status(status);
        sink.set_header(LOCATION_HEADER, &location);
        sink.end();

        info!(
            status,
            location = %location,
            kind = %result.kind(),
            "Redirect issued"
        );

        Ok(DispatchOutcome::Redirected { status, location })
    }
}

impl<M: RuleMatcher> Clone for RedirectDispatcher<M> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
