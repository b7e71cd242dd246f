//! Label Matchers
//!
//! Predicates over label values, bound to one label name:
//!
//! - **types**: `Matcher` and `MatchType` (`=`, `!=`, `=~`, `!~`)
//! - **set_matches**: literal-alternation extraction for `=~"a|b|c"` lookups
//! - **parser**: selector strings (`metric{name="value", ...}`) into matchers
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use label_index::matcher::{parse_selector, MatchType};
//!
//! let matchers = parse_selector(r#"http_requests{method=~"GET|POST"}"#).unwrap();
//! assert_eq!(matchers.len(), 2);
//! assert_eq!(matchers[1].match_type(), MatchType::Regexp);
//! assert!(matchers[1].matches("POST"));
//! ```

mod error;
mod types;
mod parser;
mod set_matches;

pub use error::{MatcherError, MatcherResult};
pub use types::{MatchType, Matcher};
pub use parser::parse_selector;
pub use set_matches::find_set_matches;
