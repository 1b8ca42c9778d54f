//! Environment name inference.
//!
//! Maps a raw environment string (for example a deployment stage such as
//! `prod-east`) to a canonical environment name through an ordered list of
//! pattern rules. The first rule whose pattern matches the whole raw string
//! wins; when nothing matches the raw string is used unchanged.

use regex::Regex;

use crate::error::{EasyEnvError, Result};

/// A single (pattern, canonical name) rule.
#[derive(Debug, Clone)]
pub struct EnvMatcherRule {
    source: String,
    pattern: Regex,
    env: String,
}

impl EnvMatcherRule {
    /// Compile a rule. The pattern always matches against the whole raw
    /// string, whether or not it carries its own `^`/`$` anchors.
    ///
    /// # Example
    ///
    /// ```
    /// use easyenv::environment::EnvMatcherRule;
    ///
    /// let rule = EnvMatcherRule::new("prod-.*", "prod").unwrap();
    /// assert!(rule.matches("prod-east"));
    /// assert!(!rule.matches("preprod-east"));
    /// ```
    pub fn new(pattern: &str, env: impl Into<String>) -> Result<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| EasyEnvError::InvalidMatcher {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
            env: env.into(),
        })
    }

    /// The pattern as written in configuration.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// The canonical environment name this rule maps to.
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Whether the rule matches the entire raw string.
    pub fn matches(&self, raw: &str) -> bool {
        self.pattern.is_match(raw)
    }
}

/// Infer the canonical environment name for `raw`.
///
/// Rules are evaluated in order and the first match wins. Without a match
/// (or with no rules at all) `raw` is returned unchanged.
pub fn infer_env<'a>(rules: &'a [EnvMatcherRule], raw: &'a str) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.matches(raw))
        .map(|rule| rule.env())
        .unwrap_or(raw)
}

/// Ordered list of environment matcher rules.
///
/// # Example
///
/// ```
/// use easyenv::environment::EnvMatcher;
///
/// let matcher = EnvMatcher::from_pairs([("prod-.*", "prod"), ("stg", "staging")]).unwrap();
/// assert_eq!(matcher.infer("prod-east"), "prod");
/// assert_eq!(matcher.infer("stg"), "staging");
/// assert_eq!(matcher.infer("qa"), "qa");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvMatcher {
    rules: Vec<EnvMatcherRule>,
}

impl EnvMatcher {
    /// Create a matcher with no rules (identity inference).
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a matcher from `(pattern, env)` pairs, keeping their order.
    pub fn from_pairs<P, E>(pairs: impl IntoIterator<Item = (P, E)>) -> Result<Self>
    where
        P: AsRef<str>,
        E: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, env)| EnvMatcherRule::new(pattern.as_ref(), env))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[EnvMatcherRule] {
        &self.rules
    }

    /// Infer the canonical environment name for `raw`.
    pub fn infer<'a>(&'a self, raw: &'a str) -> &'a str {
        infer_env(&self.rules, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> EnvMatcher {
        EnvMatcher::from_pairs([("prod-.*", "prod"), ("stg", "staging")]).unwrap()
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(matcher().infer("prod-east"), "prod");
    }

    #[test]
    fn unmatched_input_falls_back_to_identity() {
        assert_eq!(matcher().infer("qa"), "qa");
    }

    #[test]
    fn empty_rule_list_returns_raw() {
        let matcher = EnvMatcher::new();
        assert_eq!(matcher.infer("anything"), "anything");
        assert_eq!(infer_env(&[], "local"), "local");
    }

    #[test]
    fn patterns_match_whole_string_only() {
        let matcher = matcher();
        assert_eq!(matcher.infer("stg-2"), "stg-2");
        assert_eq!(matcher.infer("my-stg"), "my-stg");
        assert_eq!(matcher.infer("preprod-east"), "preprod-east");
    }

    #[test]
    fn explicit_anchors_are_tolerated() {
        let matcher = EnvMatcher::from_pairs([("^dev$", "development")]).unwrap();
        assert_eq!(matcher.infer("dev"), "development");
        assert_eq!(matcher.infer("devbox"), "devbox");
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let matcher = EnvMatcher::from_pairs([("qa|test", "qa")]).unwrap();
        assert_eq!(matcher.infer("test"), "qa");
        assert_eq!(matcher.infer("qa-1"), "qa-1");
        assert_eq!(matcher.infer("latest"), "latest");
    }

    #[test]
    fn earlier_rule_shadows_later_rule() {
        let matcher =
            EnvMatcher::from_pairs([("prod.*", "production"), ("prod-east", "east")]).unwrap();
        assert_eq!(matcher.infer("prod-east"), "production");
    }

    #[test]
    fn inference_is_repeatable() {
        let matcher = matcher();
        assert_eq!(matcher.infer("prod-west"), matcher.infer("prod-west"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let result = EnvMatcherRule::new("prod-(", "prod");
        assert!(matches!(result, Err(EasyEnvError::InvalidMatcher { .. })));
    }

    #[test]
    fn rule_exposes_pattern_and_env() {
        let rule = EnvMatcherRule::new("stg", "staging").unwrap();
        assert_eq!(rule.pattern(), "stg");
        assert_eq!(rule.env(), "staging");
    }
}
