//! Matcher error types

use thiserror::Error;

/// Errors raised while building matchers
#[derive(Error, Debug)]
pub enum MatcherError {
    /// Regex matcher value did not compile
    #[error("Invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Selector string could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for matcher construction and parsing
pub type MatcherResult<T> = Result<T, MatcherError>;
