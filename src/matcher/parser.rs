//! Selector Parser
//!
//! Parses series selectors into matchers.
//!
//! # Supported Syntax
//!
//! ```text
//! metric_name
//! metric_name{label="value", label!="value"}
//! {label=~"regex", label!~"regex"}
//! ```
//!
//! A leading metric name becomes an equality matcher on `__name__`. String
//! values are double-quoted and accept `\\`, `\"`, `\n` and `\t` escapes.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while},
    character::complete::{char, multispace0, satisfy},
    combinator::{opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, terminated},
    IResult,
};

use crate::matcher::error::{MatcherError, MatcherResult};
use crate::matcher::types::{MatchType, Matcher};
use crate::model::METRIC_NAME;

/// A label matcher before its regex (if any) is compiled
type RawMatcher<'a> = (&'a str, MatchType, String);

/// Parse a selector string into matchers
pub fn parse_selector(input: &str) -> MatcherResult<Vec<Matcher>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(MatcherError::Parse("empty selector".to_string()));
    }

    let (metric, raw) = match parse_full_selector(input) {
        Ok((remaining, parsed)) => {
            if remaining.trim().is_empty() {
                parsed
            } else {
                return Err(MatcherError::Parse(format!(
                    "Unexpected input after selector: '{}'",
                    remaining.trim()
                )));
            }
        }
        Err(e) => return Err(MatcherError::Parse(format!("{:?}", e))),
    };

    let mut matchers = Vec::with_capacity(raw.len() + 1);
    if let Some(metric) = metric {
        matchers.push(Matcher::equal(METRIC_NAME, metric));
    }
    for (name, match_type, value) in raw {
        matchers.push(Matcher::new(match_type, name, value)?);
    }

    Ok(matchers)
}

fn parse_full_selector(input: &str) -> IResult<&str, (Option<&str>, Vec<RawMatcher<'_>>)> {
    let (input, _) = multispace0(input)?;
    let (input, metric) = opt(parse_identifier)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, matchers) = opt(parse_matcher_block)(input)?;
    let (input, _) = multispace0(input)?;

    Ok((input, (metric, matchers.unwrap_or_default())))
}

/// Parse `{a="b", c=~"d"}`, allowing a trailing comma
fn parse_matcher_block(input: &str) -> IResult<&str, Vec<RawMatcher<'_>>> {
    delimited(
        pair(char('{'), multispace0),
        terminated(
            separated_list0(
                delimited(multispace0, char(','), multispace0),
                parse_label_matcher,
            ),
            opt(pair(multispace0, char(','))),
        ),
        pair(multispace0, char('}')),
    )(input)
}

fn parse_label_matcher(input: &str) -> IResult<&str, RawMatcher<'_>> {
    let (input, name) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, match_type) = parse_match_type(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = parse_string(input)?;

    Ok((input, (name, match_type, value)))
}

fn parse_match_type(input: &str) -> IResult<&str, MatchType> {
    alt((
        value(MatchType::Regexp, tag("=~")),
        value(MatchType::NotRegexp, tag("!~")),
        value(MatchType::NotEqual, tag("!=")),
        value(MatchType::Equal, tag("=")),
    ))(input)
}

/// Parse a label or metric name
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_' || c == ':'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == ':'),
    ))(input)
}

/// Parse a double-quoted string literal
fn parse_string(input: &str) -> IResult<&str, String> {
    let (input, body) = delimited(
        char('"'),
        opt(escaped_transform(
            is_not("\\\""),
            '\\',
            alt((
                value("\\", tag("\\")),
                value("\"", tag("\"")),
                value("\n", tag("n")),
                value("\t", tag("t")),
            )),
        )),
        char('"'),
    )(input)?;

    Ok((input, body.unwrap_or_default()))
}
