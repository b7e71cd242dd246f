//! Literal-alternation extraction
//!
//! Recognizes anchored regexes of the shape `^(?:alt1|alt2|...)$` whose
//! alternatives are plain literals, so `=~"GET|POST"` can be answered with
//! one posting-list fetch per alternative instead of scanning every value.

const PREFIX: &str = "^(?:";
const SUFFIX: &str = ")$";

/// Characters with special meaning in a regex
#[inline]
fn is_regex_meta(c: char) -> bool {
    matches!(
        c,
        '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
    )
}

/// Extract the literal alternatives of an anchored alternation
///
/// Returns an empty vector when the pattern is not a pure literal
/// alternation; callers must then fall back to evaluating the regex against
/// every value. An empty alternative (`a||b`) also yields an empty vector,
/// since it would match the empty string.
pub fn find_set_matches(pattern: &str) -> Vec<String> {
    let Some(inner) = pattern
        .strip_prefix(PREFIX)
        .and_then(|rest| rest.strip_suffix(SUFFIX))
    else {
        return Vec::new();
    };

    let mut sets = vec![String::new()];
    let mut escaped = false;

    for c in inner.chars() {
        if escaped {
            if !is_regex_meta(c) && c != '\\' {
                // undefined escape such as \d or \w
                return Vec::new();
            }
            if let Some(current) = sets.last_mut() {
                current.push(c);
            }
            escaped = false;
        } else if c == '|' {
            sets.push(String::new());
        } else if is_regex_meta(c) {
            return Vec::new();
        } else if c == '\\' {
            escaped = true;
        } else if let Some(current) = sets.last_mut() {
            current.push(c);
        }
    }

    if escaped || sets.iter().any(String::is_empty) {
        return Vec::new();
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_alternation() {
        assert_eq!(find_set_matches("^(?:a|bc|d)$"), vec!["a", "bc", "d"]);
        assert_eq!(find_set_matches("^(?:GET)$"), vec!["GET"]);
    }

    #[test]
    fn test_metacharacter_aborts() {
        assert!(find_set_matches("^(?:a.|b)$").is_empty());
        assert!(find_set_matches("^(?:a+)$").is_empty());
        assert!(find_set_matches("^(?:(a|b))$").is_empty());
    }

    #[test]
    fn test_missing_wrapper() {
        assert!(find_set_matches("a|b").is_empty());
        assert!(find_set_matches("^(a|b)$").is_empty());
        assert!(find_set_matches("^(?:a|b)").is_empty());
        assert!(find_set_matches("^(?:$").is_empty());
    }

    #[test]
    fn test_escapes() {
        assert_eq!(find_set_matches(r"^(?:a\.b|c\|d)$"), vec!["a.b", "c|d"]);
        assert_eq!(find_set_matches(r"^(?:a\\b)$"), vec![r"a\b"]);
        assert!(find_set_matches(r"^(?:\d)$").is_empty());
        assert!(find_set_matches(r"^(?:a\)$").is_empty());
    }

    #[test]
    fn test_empty_alternatives_fall_back() {
        assert!(find_set_matches("^(?:a||b)$").is_empty());
        assert!(find_set_matches("^(?:a|)$").is_empty());
        assert!(find_set_matches("^(?:)$").is_empty());
    }

    #[test]
    fn test_non_ascii_literals() {
        assert_eq!(find_set_matches("^(?:café|naïve)$"), vec!["café", "naïve"]);
    }
}
