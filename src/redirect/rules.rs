//! Redirect rule records.
//!
//! A rule pairs a compiled pattern with a replacement template and the class
//! of redirect to issue. Rules are immutable once built and cheap to clone:
//! clones share the compiled pattern and the template.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Upper bound on the compiled size of a single rule pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// The class of redirect a rule issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectKind {
    /// 302 Found
    Temporary,
    /// 301 Moved Permanently
    Permanent,
}

impl RedirectKind {
    /// The HTTP status code for this kind of redirect.
    pub fn status_code(&self) -> u16 {
        match self {
            RedirectKind::Temporary => 302,
            RedirectKind::Permanent => 301,
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectKind::Temporary => f.write_str("temporary"),
            RedirectKind::Permanent => f.write_str("permanent"),
        }
    }
}

/// A configured redirect rule.
///
/// The replacement uses the regex crate's expansion syntax: `$1`, `${1}`,
/// `$name`, `${name}`, and `$$` for a literal dollar sign.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    pattern: Regex,
    replacement: Arc<str>,
    kind: RedirectKind,
}

impl RedirectRule {
    /// Build a case-sensitive rule from a pattern string.
    pub fn new(pattern: &str, replacement: &str, kind: RedirectKind) -> Result<Self> {
        Self::build(pattern, replacement, kind, false)
    }

    /// Build a rule whose pattern ignores case.
    pub fn case_insensitive(pattern: &str, replacement: &str, kind: RedirectKind) -> Result<Self> {
        Self::build(pattern, replacement, kind, true)
    }

    /// Build a rule from an already compiled pattern.
    pub fn from_regex(pattern: Regex, replacement: &str, kind: RedirectKind) -> Self {
        Self {
            pattern,
            replacement: Arc::from(replacement),
            kind,
        }
    }

    fn build(
        pattern: &str,
        replacement: &str,
        kind: RedirectKind,
        case_insensitive: bool,
    ) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        Ok(Self::from_regex(pattern, replacement, kind))
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The replacement template.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// The redirect class.
    pub fn kind(&self) -> RedirectKind {
        self.kind
    }

    /// Returns `true` if both handles refer to the same compiled rule.
    pub fn same_rule(&self, other: &RedirectRule) -> bool {
        Arc::ptr_eq(&self.replacement, &other.replacement)
            && self.pattern.as_str() == other.pattern.as_str()
            && self.kind == other.kind
    }
}

impl fmt::Display for RedirectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.pattern.as_str(),
            self.replacement,
            self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RerouterError;

    #[test]
    fn test_status_codes() {
        assert_eq!(RedirectKind::Permanent.status_code(), 301);
        assert_eq!(RedirectKind::Temporary.status_code(), 302);
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let kind: RedirectKind = serde_yaml::from_str("permanent").unwrap();
        assert_eq!(kind, RedirectKind::Permanent);
        assert_eq!(serde_json::to_string(&RedirectKind::Temporary).unwrap(), "\"temporary\"");
    }

    #[test]
    fn test_rule_accessors() {
        let rule = RedirectRule::new("^/old/(.*)$", "/new/$1", RedirectKind::Permanent).unwrap();
        assert_eq!(rule.pattern().as_str(), "^/old/(.*)$");
        assert_eq!(rule.replacement(), "/new/$1");
        assert_eq!(rule.kind(), RedirectKind::Permanent);
        assert_eq!(rule.to_string(), "^/old/(.*)$ -> /new/$1 (permanent)");
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let rule = RedirectRule::new("^/old", "/new", RedirectKind::Temporary).unwrap();
        assert!(rule.pattern().is_match("/old"));
        assert!(!rule.pattern().is_match("/OLD"));
    }

    #[test]
    fn test_case_insensitive_rule() {
        let rule = RedirectRule::case_insensitive("^/old", "/new", RedirectKind::Temporary).unwrap();
        assert!(rule.pattern().is_match("/OLD"));
    }

    #[test]
    fn test_malformed_pattern_propagates_regex_error() {
        let err = RedirectRule::new("(unclosed", "/x", RedirectKind::Temporary).unwrap_err();
        assert!(matches!(err, RerouterError::Pattern(_)));
    }

    #[test]
    fn test_clone_shares_rule() {
        let rule = RedirectRule::new("^/a$", "/b", RedirectKind::Temporary).unwrap();
        let copy = rule.clone();
        assert!(rule.same_rule(&copy));

        let other = RedirectRule::new("^/a$", "/b", RedirectKind::Temporary).unwrap();
        assert!(!rule.same_rule(&other));
    }
}
