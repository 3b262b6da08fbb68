//! Ordered, first-match-wins rule evaluation.

use tracing::trace;

use super::result::MatchResult;
use super::rules::RedirectRule;
use crate::error::{RerouterError, Result};

/// Finds the rule, if any, that applies to a URL.
///
/// Implementations must be pure: the same URL and rule list always yield an
/// equivalent result, with no side effects visible to other callers.
pub trait RuleMatcher: Send + Sync {
    /// Evaluate `rules` in order against `url` and return the first match.
    ///
    /// Returns `Ok(None)` if no rule matches or `rules` is empty.
    fn find_match(&self, url: &str, rules: &[RedirectRule]) -> Result<Option<MatchResult>>;
}

/// The standard matcher: positional priority, first successful pattern wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl FirstMatch {
    /// Create a new matcher.
    pub fn new() -> Self {
        Self
    }
}

impl RuleMatcher for FirstMatch {
    fn find_match(&self, url: &str, rules: &[RedirectRule]) -> Result<Option<MatchResult>> {
        ensure_url(url)?;

        for (position, rule) in rules.iter().enumerate() {
            let result = MatchResult::evaluate(rule, url);
            if result.is_match() {
                trace!(url = %url, position, rule = %rule, "Rule matched");
                return Ok(Some(result));
            }
        }

        trace!(url = %url, rules = rules.len(), "No rule matched");
        Ok(None)
    }
}

/// Reject blank URLs before any evaluation happens.
pub(crate) fn ensure_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(RerouterError::InvalidArgument("url is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::rules::RedirectKind;

    fn rule(pattern: &str, replacement: &str, kind: RedirectKind) -> RedirectRule {
        RedirectRule::new(pattern, replacement, kind).unwrap()
    }

    #[test]
    fn test_single_rule_match() {
        let rules = vec![rule("^/old/(.*)$", "/new/$1", RedirectKind::Permanent)];
        let result = FirstMatch.find_match("/old/page", &rules).unwrap().unwrap();
        assert_eq!(result.redirect_target(), "/new/page");
        assert_eq!(result.status_code(), 301);
    }

    #[test]
    fn test_no_match() {
        let rules = vec![rule("^/old/(.*)$", "/new/$1", RedirectKind::Permanent)];
        assert!(FirstMatch.find_match("/unrelated", &rules).unwrap().is_none());
    }

    #[test]
    fn test_empty_rules() {
        assert!(FirstMatch.find_match("/anything", &[]).unwrap().is_none());
    }

    #[test]
    fn test_positional_priority() {
        let rules = vec![
            rule("a", "/first", RedirectKind::Permanent),
            rule(".*", "/fallback", RedirectKind::Temporary),
        ];

        let result = FirstMatch.find_match("/cat", &rules).unwrap().unwrap();
        assert_eq!(result.redirect_target(), "/first");
        assert!(result.rule().same_rule(&rules[0]));

        let result = FirstMatch.find_match("/dog", &rules).unwrap().unwrap();
        assert_eq!(result.redirect_target(), "/fallback");
        assert_eq!(result.status_code(), 302);
    }

    #[test]
    fn test_order_beats_specificity() {
        let rules = vec![
            rule("^/docs/.*$", "/general", RedirectKind::Temporary),
            rule("^/docs/api/v1/users$", "/specific", RedirectKind::Temporary),
        ];
        let result = FirstMatch
            .find_match("/docs/api/v1/users", &rules)
            .unwrap()
            .unwrap();
        assert_eq!(result.redirect_target(), "/general");
    }

    #[test]
    fn test_matches_full_absolute_url() {
        let rules = vec![rule(
            r"^https://old\.example\.com/(.*)$",
            "https://new.example.com/$1",
            RedirectKind::Permanent,
        )];
        let result = FirstMatch
            .find_match("https://old.example.com/a/b?q=1", &rules)
            .unwrap()
            .unwrap();
        assert_eq!(result.redirect_target(), "https://new.example.com/a/b?q=1");
    }

    #[test]
    fn test_blank_url_rejected() {
        let rules = vec![rule(".*", "/x", RedirectKind::Temporary)];
        let err = FirstMatch.find_match("  ", &rules).unwrap_err();
        assert!(matches!(err, RerouterError::InvalidArgument(_)));
    }

    #[test]
    fn test_deterministic() {
        let rules = vec![rule("^/p/(\\d+)$", "/item/$1", RedirectKind::Temporary)];
        let a = FirstMatch.find_match("/p/7", &rules).unwrap().unwrap();
        let b = FirstMatch.find_match("/p/7", &rules).unwrap().unwrap();
        assert_eq!(a.redirect_target(), b.redirect_target());
    }
}
