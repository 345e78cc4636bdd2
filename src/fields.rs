//! Lenient parsing for user-entered form fields.
//!
//! Field values are read the way a browser form reads an integer: leading
//! whitespace and a sign are accepted, trailing garbage is ignored, and a
//! field with no leading digits is not a number.

use once_cell::sync::Lazy;
use regex::Regex;

static INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("int prefix pattern is valid"));

/// Parse the leading integer of `field`.
///
/// Returns `None` when the field does not start with digits (after optional
/// whitespace and sign) or the value overflows `i64`.
pub fn parse_int_prefix(field: &str) -> Option<i64> {
    let caps = INT_PREFIX.captures(field)?;
    caps.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_int_prefix("42"), Some(42));
    }

    #[test]
    fn test_leading_whitespace_and_sign() {
        assert_eq!(parse_int_prefix("  -7"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
    }

    #[test]
    fn test_trailing_garbage_is_ignored() {
        assert_eq!(parse_int_prefix("18px"), Some(18));
        assert_eq!(parse_int_prefix("05 "), Some(5));
    }

    #[test]
    fn test_non_numeric_is_none() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("px18"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), None);
    }
}
