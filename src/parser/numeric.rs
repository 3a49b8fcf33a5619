//! Signed financial number extraction.
//!
//! Handles accounting notation: parenthesized negatives, thousands
//! separators, currency symbols, and trailing Dr/Cr markers. A `Cr` marker
//! negates the value and `Dr` keeps its sign — this is the accounting
//! convention for statement lines, not a general rule.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum absolute value a token must reach to count as a financial
/// figure. Rejects bare small integers such as footnote markers.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 100.0;

static CREDIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcr\b").unwrap());

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:dr|cr)\b").unwrap());

/// A bare four-digit integer in the calendar range reads as a year, not a
/// monetary amount.
static LIKELY_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:19|20)\d{2}$").unwrap());

/// Extract a financial number from a line using the default magnitude
/// threshold.
///
/// # Example
///
/// ```
/// use finsift::parser::extract_number;
///
/// assert_eq!(extract_number("Fee (500)"), Some(-500.0));
/// assert_eq!(extract_number("Balance 1,200 Cr"), Some(-1200.0));
/// assert_eq!(extract_number("Year 2023"), None);
/// ```
pub fn extract_number(line: &str) -> Option<f64> {
    extract_number_with_threshold(line, DEFAULT_MIN_MAGNITUDE)
}

/// Extract a financial number, requiring `|value| >= min_magnitude`.
///
/// Returns the first qualifying whitespace-separated token, sign-adjusted.
/// Never panics; `None` when nothing qualifies.
pub fn extract_number_with_threshold(line: &str, min_magnitude: f64) -> Option<f64> {
    if line.is_empty() {
        return None;
    }

    let sign = if CREDIT_RE.is_match(line) { -1.0 } else { 1.0 };
    let cleaned = MARKER_RE.replace_all(line, "");

    for token in cleaned.split_whitespace() {
        let had_notation = token
            .chars()
            .any(|c| matches!(c, ',' | '(' | '$' | '€' | '£' | '¥'));
        let digits: String = token
            .chars()
            .filter_map(|c| match c {
                ',' | ')' | '$' | '€' | '£' | '¥' => None,
                '(' => Some('-'),
                c => Some(c),
            })
            .collect();

        let value: f64 = match digits.parse() {
            Ok(value) => value,
            Err(_) => continue,
        };
        if value.abs() < min_magnitude {
            continue;
        }
        if !had_notation && LIKELY_YEAR_RE.is_match(&digits) {
            continue;
        }
        return Some(sign * value);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthetical_negative() {
        assert_eq!(extract_number("Fee (500)"), Some(-500.0));
    }

    #[test]
    fn test_debit_keeps_sign() {
        assert_eq!(extract_number("Balance 1,200 Dr"), Some(1200.0));
    }

    #[test]
    fn test_credit_negates() {
        assert_eq!(extract_number("Balance 1,200 Cr"), Some(-1200.0));
    }

    #[test]
    fn test_year_rejected() {
        assert_eq!(extract_number("Year 2023"), None);
        assert_eq!(extract_number("For the period ended 1999"), None);
    }

    #[test]
    fn test_small_values_rejected() {
        assert_eq!(extract_number("Note 12"), None);
        assert_eq!(extract_number("Item 99.5"), None);
    }

    #[test]
    fn test_currency_symbols_stripped() {
        assert_eq!(extract_number("Total $1,000,000"), Some(1_000_000.0));
        assert_eq!(extract_number("Amount €540.25"), Some(540.25));
    }

    #[test]
    fn test_separated_year_still_extracts_amounts() {
        // The year guard only rejects bare four-digit tokens.
        assert_eq!(extract_number("FY 2023 revenue 2,023"), Some(2023.0));
        assert_eq!(extract_number("Charged 2023.00"), Some(2023.0));
    }

    #[test]
    fn test_first_qualifying_token_wins() {
        assert_eq!(extract_number("12 items at 450 total 5,400"), Some(450.0));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(extract_number(""), None);
        assert_eq!(extract_number("No figures here"), None);
    }

    #[test]
    fn test_custom_threshold() {
        assert_eq!(extract_number_with_threshold("Qty 12", 10.0), Some(12.0));
        assert_eq!(extract_number_with_threshold("Qty 12", 100.0), None);
    }
}
