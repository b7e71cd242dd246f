//! Matcher types
//!
//! Regex matchers are fully anchored: the value `a|b` compiles to
//! `^(?:a|b)$`, and that anchored form is what [`Matcher::pattern`] exposes
//! to the literal-alternation fast path.

use crate::matcher::error::{MatcherError, MatcherResult};
use regex::Regex;
use std::fmt;

/// Kind of comparison a matcher performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// `name="value"`
    Equal,
    /// `name!="value"`
    NotEqual,
    /// `name=~"regex"`
    Regexp,
    /// `name!~"regex"`
    NotRegexp,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Equal => write!(f, "="),
            MatchType::NotEqual => write!(f, "!="),
            MatchType::Regexp => write!(f, "=~"),
            MatchType::NotRegexp => write!(f, "!~"),
        }
    }
}

#[derive(Debug, Clone)]
enum Predicate {
    Equal,
    NotEqual,
    Regexp(Regex),
    NotRegexp(Regex),
}

/// A predicate over the values of one label name
#[derive(Debug, Clone)]
pub struct Matcher {
    name: String,
    value: String,
    predicate: Predicate,
}

impl Matcher {
    /// Build a matcher, compiling the anchored regex for `=~` and `!~`
    pub fn new(
        match_type: MatchType,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> MatcherResult<Self> {
        let value = value.into();
        let predicate = match match_type {
            MatchType::Equal => Predicate::Equal,
            MatchType::NotEqual => Predicate::NotEqual,
            MatchType::Regexp => Predicate::Regexp(compile_anchored(&value)?),
            MatchType::NotRegexp => Predicate::NotRegexp(compile_anchored(&value)?),
        };

        Ok(Self {
            name: name.into(),
            value,
            predicate,
        })
    }

    /// Shorthand for an equality matcher, which cannot fail
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            predicate: Predicate::Equal,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn match_type(&self) -> MatchType {
        match self.predicate {
            Predicate::Equal => MatchType::Equal,
            Predicate::NotEqual => MatchType::NotEqual,
            Predicate::Regexp(_) => MatchType::Regexp,
            Predicate::NotRegexp(_) => MatchType::NotRegexp,
        }
    }

    /// Anchored regex source for the regex kinds
    pub fn pattern(&self) -> Option<&str> {
        match &self.predicate {
            Predicate::Regexp(re) | Predicate::NotRegexp(re) => Some(re.as_str()),
            Predicate::Equal | Predicate::NotEqual => None,
        }
    }

    /// Test a label value against this matcher
    pub fn matches(&self, value: &str) -> bool {
        match &self.predicate {
            Predicate::Equal => self.value == value,
            Predicate::NotEqual => self.value != value,
            Predicate::Regexp(re) => re.is_match(value),
            Predicate::NotRegexp(re) => !re.is_match(value),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:?}", self.name, self.match_type(), self.value)
    }
}

fn compile_anchored(value: &str) -> MatcherResult<Regex> {
    let pattern = format!("^(?:{})$", value);
    Regex::new(&pattern).map_err(|source| MatcherError::InvalidRegex { pattern, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality() {
        let m = Matcher::equal("method", "GET");
        assert!(m.matches("GET"));
        assert!(!m.matches("POST"));
        assert_eq!(m.pattern(), None);

        let m = Matcher::new(MatchType::NotEqual, "method", "GET").unwrap();
        assert!(!m.matches("GET"));
        assert!(m.matches("POST"));
    }

    #[test]
    fn test_regex_is_anchored() {
        let m = Matcher::new(MatchType::Regexp, "method", "GET|POST").unwrap();
        assert_eq!(m.pattern(), Some("^(?:GET|POST)$"));
        assert!(m.matches("GET"));
        assert!(!m.matches("GETX"));
        assert!(!m.matches("XPOST"));

        let m = Matcher::new(MatchType::NotRegexp, "method", "G.*").unwrap();
        assert!(!m.matches("GET"));
        assert!(m.matches("POST"));
    }

    #[test]
    fn test_invalid_regex() {
        let err = Matcher::new(MatchType::Regexp, "a", "(").unwrap_err();
        assert!(matches!(err, MatcherError::InvalidRegex { .. }));
    }

    #[test]
    fn test_display() {
        let m = Matcher::new(MatchType::NotRegexp, "job", "api.*").unwrap();
        assert_eq!(m.to_string(), r#"job!~"api.*""#);
    }
}
