//! Label matcher to SQL predicate translation
//!
//! Prometheus treats an absent label and a label with an empty value as the
//! same thing. Empty values are stored as `NULL`, so every predicate here has
//! to give `NULL` the answer an empty string would get.
//!
//! Whether a regex matches the empty string is decided locally with the
//! `regex` crate before the statement is sent. CrateDB evaluates `~` with the
//! Java regex engine, so for patterns where the two engines disagree the
//! `NULL` handling may be off. Such patterns are rare, and the predicate is
//! emitted as-is without any attempt to rewrite them.

use regex::Regex;

use crate::error::{Result, TranslateError};
use crate::escape::{escape_label_name, escape_label_value};
use crate::model::{LabelMatcher, MatchType};

/// Anchor a Prometheus regex so it has to match the whole value
pub fn anchor_pattern(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

/// Whether an anchored pattern accepts the empty string
fn matches_empty(matcher: &LabelMatcher, anchored: &str) -> Result<bool> {
    let re = Regex::new(anchored).map_err(|source| TranslateError::InvalidRegex {
        label: matcher.name.clone(),
        pattern: matcher.value.clone(),
        source: Box::new(source),
    })?;
    Ok(re.is_match(""))
}

/// Translate one matcher into a parenthesized SQL predicate
pub fn matcher_to_predicate(matcher: &LabelMatcher) -> Result<String> {
    let column = escape_label_name(&matcher.name);

    let predicate = match matcher.match_type {
        MatchType::Equal if matcher.value.is_empty() => format!("({column} IS NULL)"),
        MatchType::Equal => format!("({column} = {})", escape_label_value(&matcher.value)),
        MatchType::NotEqual if matcher.value.is_empty() => format!("({column} IS NOT NULL)"),
        MatchType::NotEqual => format!("({column} != {})", escape_label_value(&matcher.value)),
        MatchType::RegexMatch => {
            let anchored = anchor_pattern(&matcher.value);
            let pattern = escape_label_value(&anchored);
            if matches_empty(matcher, &anchored)? {
                format!("({column} ~ {pattern} OR {column} IS NULL)")
            } else {
                format!("({column} ~ {pattern})")
            }
        }
        MatchType::RegexNoMatch => {
            let anchored = anchor_pattern(&matcher.value);
            let pattern = escape_label_value(&anchored);
            if matches_empty(matcher, &anchored)? {
                format!("({column} !~ {pattern})")
            } else {
                format!("({column} !~ {pattern} OR {column} IS NULL)")
            }
        }
    };

    Ok(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate(name: &str, value: &str, match_type: MatchType) -> String {
        matcher_to_predicate(&LabelMatcher::new(name, value, match_type)).unwrap()
    }

    #[test]
    fn test_equal_empty_matches_null_only() {
        assert_eq!(
            predicate("job", "", MatchType::Equal),
            r#"("ljob" IS NULL)"#
        );
    }

    #[test]
    fn test_equal_value() {
        assert_eq!(
            predicate("job", "api", MatchType::Equal),
            r#"("ljob" = 'api')"#
        );
    }

    #[test]
    fn test_not_equal() {
        assert_eq!(
            predicate("job", "", MatchType::NotEqual),
            r#"("ljob" IS NOT NULL)"#
        );
        assert_eq!(
            predicate("job", "api", MatchType::NotEqual),
            r#"("ljob" != 'api')"#
        );
    }

    #[test]
    fn test_regex_not_matching_empty_excludes_null() {
        assert_eq!(
            predicate("job", "a.*", MatchType::RegexMatch),
            r#"("ljob" ~ '^(?:a.*)$')"#
        );
    }

    #[test]
    fn test_regex_matching_empty_includes_null() {
        assert_eq!(
            predicate("job", ".*", MatchType::RegexMatch),
            r#"("ljob" ~ '^(?:.*)$' OR "ljob" IS NULL)"#
        );
        assert_eq!(
            predicate("job", "", MatchType::RegexMatch),
            r#"("ljob" ~ '^(?:)$' OR "ljob" IS NULL)"#
        );
    }

    #[test]
    fn test_regex_optional_prefix_includes_null() {
        // "a*" accepts the empty string, so series without the label match too
        assert_eq!(
            predicate("job", "a*", MatchType::RegexMatch),
            r#"("ljob" ~ '^(?:a*)$' OR "ljob" IS NULL)"#
        );
    }

    #[test]
    fn test_regex_no_match_inverts_null_handling() {
        assert_eq!(
            predicate("job", "api|web", MatchType::RegexNoMatch),
            r#"("ljob" !~ '^(?:api|web)$' OR "ljob" IS NULL)"#
        );
        assert_eq!(
            predicate("job", "x?", MatchType::RegexNoMatch),
            r#"("ljob" !~ '^(?:x?)$')"#
        );
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        // Without the group, "^a|b$" would match "abc"
        let anchored = anchor_pattern("a|b");
        let re = Regex::new(&anchored).unwrap();
        assert!(re.is_match("a"));
        assert!(!re.is_match("abc"));
    }

    #[test]
    fn test_values_and_patterns_are_escaped() {
        assert_eq!(
            predicate("path", r"C:\it's", MatchType::Equal),
            r#"("lpath" = 'C:\\it\'s')"#
        );
        assert_eq!(
            predicate("path", r"a\.b", MatchType::RegexMatch),
            r#"("lpath" ~ '^(?:a\\.b)$')"#
        );
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let matcher = LabelMatcher::new("job", "(", MatchType::RegexMatch);
        let err = matcher_to_predicate(&matcher).unwrap_err();
        let TranslateError::InvalidRegex { label, .. } = &err else {
            panic!("expected an invalid regex error, got {err}");
        };
        assert_eq!(label, "job");

        let matcher = LabelMatcher::new("job", "[", MatchType::RegexNoMatch);
        let err = matcher_to_predicate(&matcher).unwrap_err();
        assert!(err.is_client_error());
    }
}
