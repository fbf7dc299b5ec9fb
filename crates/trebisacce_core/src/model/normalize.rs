//! Free-form input normalisation shared by record inputs and the CLI.
//!
//! Amounts arrive in local notation (`1.234,50`, `$ 980`), dates in a few
//! common layouts, names with stray spacing and casing.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static AMOUNT_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d,.\-]").expect("valid amount regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Lowercases, trims and collapses inner whitespace.
///
/// Two names are considered the same record when their normalised forms match.
pub fn normalize_name(value: &str) -> String {
    WHITESPACE_RE
        .replace_all(value.trim(), " ")
        .to_lowercase()
}

/// Parses an amount typed in either `1234.5` or `1.234,5` notation.
///
/// Rules:
/// - everything except digits, `,`, `.` and `-` is dropped;
/// - with both separators present, dots are thousands separators and the
///   first comma is the decimal point;
/// - with only a comma present, the first comma is the decimal point.
pub fn normalize_amount(value: &str) -> Option<Decimal> {
    let cleaned = AMOUNT_NOISE_RE.replace_all(value.trim(), "");
    if cleaned.is_empty() {
        return None;
    }

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');
    let canonical = if has_comma && has_dot {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else if has_comma {
        cleaned.replacen(',', ".", 1)
    } else {
        cleaned.into_owned()
    };

    Decimal::from_str(&canonical).ok()
}

/// Parses a calendar date from ISO, RFC 3339, `DD/MM/YYYY` or `YYYY/MM/DD`.
///
/// Timestamps with an offset resolve to their UTC calendar day.
pub fn normalize_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, layout) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|value| value.with_timezone(&Utc).date_naive())
}

pub fn is_email_valid(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Case-insensitive substring match used by list searches.
pub(crate) fn matches_search(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = normalize_name(needle);
    if needle.is_empty() {
        return true;
    }
    haystacks
        .iter()
        .flatten()
        .any(|value| normalize_name(value).contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::{is_email_valid, matches_search, normalize_amount, normalize_date, normalize_name};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn names_are_trimmed_lowercased_and_collapsed() {
        assert_eq!(normalize_name("  Acme   Corp "), "acme corp");
        assert_eq!(normalize_name("Tech\tSolutions"), "tech solutions");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn amounts_accept_local_notation() {
        assert_eq!(normalize_amount("1.234,50"), Some(Decimal::new(123_450, 2)));
        assert_eq!(normalize_amount("$ 980"), Some(Decimal::from(980)));
        assert_eq!(normalize_amount("12,5"), Some(Decimal::new(125, 1)));
        assert_eq!(normalize_amount("3450.75"), Some(Decimal::new(345_075, 2)));
        assert_eq!(normalize_amount("-40"), Some(Decimal::from(-40)));
    }

    #[test]
    fn amounts_reject_empty_or_ambiguous_text() {
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("ARS"), None);
        assert_eq!(normalize_amount("1.2.3"), None);
    }

    #[test]
    fn dates_accept_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 18).unwrap();
        assert_eq!(normalize_date("2025-01-18"), Some(expected));
        assert_eq!(normalize_date(" 18/01/2025 "), Some(expected));
        assert_eq!(normalize_date("2025/01/18"), Some(expected));
        assert_eq!(normalize_date("2025-01-18T10:30:00Z"), Some(expected));
        assert_eq!(normalize_date("2025-13-40"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn offset_timestamps_use_the_utc_day() {
        assert_eq!(
            normalize_date("2025-01-18T23:30:00-03:00"),
            NaiveDate::from_ymd_opt(2025, 1, 19)
        );
        assert_eq!(
            normalize_date("2025-01-19T01:00:00+02:00"),
            NaiveDate::from_ymd_opt(2025, 1, 18)
        );
    }

    #[test]
    fn email_format_check() {
        assert!(is_email_valid("contact@acme.com"));
        assert!(!is_email_valid("contact@acme"));
        assert!(!is_email_valid("con tact@acme.com"));
    }

    #[test]
    fn search_matches_any_field_case_insensitively() {
        assert!(matches_search("ACME", &[Some("Acme Corp"), None]));
        assert!(matches_search("", &[None]));
        assert!(!matches_search("north", &[Some("Acme Corp"), Some("x@y.com")]));
    }
}
