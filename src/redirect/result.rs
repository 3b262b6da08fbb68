//! The outcome of evaluating a URL against a single rule.

use regex::CaptureLocations;
use std::fmt;
use std::sync::OnceLock;

use super::rules::{RedirectKind, RedirectRule};

/// A rule evaluated against one URL.
///
/// Holds the rule it was evaluated with, the URL, and the capture spans the
/// pattern produced. The redirect target is expanded from those captures on
/// first read and memoized for the lifetime of the result.
pub struct MatchResult {
    rule: RedirectRule,
    url: String,
    captures: CaptureLocations,
    matched: bool,
    target: OnceLock<String>,
}

impl MatchResult {
    /// Evaluate `rule` against `url`.
    ///
    /// Always produces a result; check [`MatchResult::is_match`] to see
    /// whether the pattern succeeded.
    pub fn evaluate(rule: &RedirectRule, url: &str) -> Self {
        let mut captures = rule.pattern().capture_locations();
        let matched = rule.pattern().captures_read(&mut captures, url).is_some();

        Self {
            rule: rule.clone(),
            url: url.to_string(),
            captures,
            matched,
            target: OnceLock::new(),
        }
    }

    /// The rule that produced this result.
    pub fn rule(&self) -> &RedirectRule {
        &self.rule
    }

    /// The URL the rule was evaluated against.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the rule's pattern matched the URL.
    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// The redirect class of the matched rule.
    pub fn kind(&self) -> RedirectKind {
        self.rule.kind()
    }

    /// HTTP status code to issue for this result.
    pub fn status_code(&self) -> u16 {
        self.rule.kind().status_code()
    }

    /// Number of capture groups in the pattern, including the implicit
    /// whole-match group.
    pub fn group_count(&self) -> usize {
        self.captures.len()
    }

    /// Text captured by the numbered group `index`, if it participated.
    pub fn group(&self, index: usize) -> Option<&str> {
        if !self.matched {
            return None;
        }
        let (start, end) = self.captures.get(index)?;
        self.url.get(start..end)
    }

    /// Text captured by the named group `name`, if it participated.
    pub fn name(&self, name: &str) -> Option<&str> {
        let index = self
            .rule
            .pattern()
            .capture_names()
            .position(|n| n == Some(name))?;
        self.group(index)
    }

    /// The URL to redirect to.
    ///
    /// Empty when the rule did not match. Otherwise the rule's replacement
    /// with back-references expanded from this result's captures. Computed
    /// once.
    pub fn redirect_target(&self) -> &str {
        self.target.get_or_init(|| self.expand_target())
    }

    /// Returns `true` if there is somewhere to redirect to.
    pub fn has_redirect(&self) -> bool {
        !self.redirect_target().is_empty()
    }

    fn expand_target(&self) -> String {
        if !self.matched {
            return String::new();
        }

        // Searching from the recorded match start reproduces the same
        // leftmost-first match, with look-around context from the full URL.
        let start = self.captures.get(0).map(|(s, _)| s).unwrap_or(0);
        let Some(caps) = self.rule.pattern().captures_at(&self.url, start) else {
            return String::new();
        };

        let mut target = String::new();
        caps.expand(self.rule.replacement(), &mut target);
        target
    }
}

impl fmt::Debug for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("rule", &self.rule.to_string())
            .field("url", &self.url)
            .field("matched", &self.matched)
            .field("target", &self.target.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str) -> RedirectRule {
        RedirectRule::new(pattern, replacement, RedirectKind::Permanent).unwrap()
    }

    #[test]
    fn test_numbered_group_expansion() {
        let result = MatchResult::evaluate(&rule("^/old/(.*)$", "/new/$1"), "/old/page");
        assert!(result.is_match());
        assert_eq!(result.group(1), Some("page"));
        assert_eq!(result.redirect_target(), "/new/page");
        assert_eq!(result.status_code(), 301);
    }

    #[test]
    fn test_named_group_expansion() {
        let result = MatchResult::evaluate(
            &rule(r"^/blog/(?P<year>\d{4})/(?P<slug>[^/]+)$", "/posts/${slug}?y=$year"),
            "/blog/2019/hello",
        );
        assert_eq!(result.name("year"), Some("2019"));
        assert_eq!(result.name("missing"), None);
        assert_eq!(result.redirect_target(), "/posts/hello?y=2019");
    }

    #[test]
    fn test_braced_and_escaped_references() {
        let result = MatchResult::evaluate(&rule("^/p/(\\d+)$", "/item/${1}x/$$5"), "/p/42");
        assert_eq!(result.redirect_target(), "/item/42x/$5");
    }

    #[test]
    fn test_unmatched_result_has_empty_target() {
        let result = MatchResult::evaluate(&rule("^/old/(.*)$", "/new/$1"), "/unrelated");
        assert!(!result.is_match());
        assert_eq!(result.group(0), None);
        assert_eq!(result.redirect_target(), "");
        assert!(!result.has_redirect());
    }

    #[test]
    fn test_unanchored_match_uses_template_only() {
        let result = MatchResult::evaluate(&rule("old", "https://example.com/"), "/very/old/path");
        assert_eq!(result.group(0), Some("old"));
        assert_eq!(result.redirect_target(), "https://example.com/");
    }

    #[test]
    fn test_word_boundary_context_preserved() {
        let result = MatchResult::evaluate(&rule(r"\bid=(\d+)", "/by-id/$1"), "/x?sid=1&id=7");
        assert_eq!(result.group(1), Some("7"));
        assert_eq!(result.redirect_target(), "/by-id/7");
    }

    #[test]
    fn test_target_is_memoized() {
        let result = MatchResult::evaluate(&rule("^/old/(.*)$", "/new/$1"), "/old/page");
        let first = result.redirect_target();
        let second = result.redirect_target();
        assert_eq!(first, second);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_optional_group_that_did_not_participate() {
        let result = MatchResult::evaluate(&rule("^/a(/b)?$", "/z$1"), "/a");
        assert_eq!(result.group(1), None);
        assert_eq!(result.group_count(), 2);
        assert_eq!(result.redirect_target(), "/z");
    }
}
