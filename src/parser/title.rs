//! Best-effort table title inference.

use crate::normalize::normalize;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum title length in characters.
const MAX_TITLE_LEN: usize = 120;

/// Document-section vocabulary that marks a line as a likely title.
const TITLE_KEYWORDS: [&str; 9] = [
    "student copy",
    "university copy",
    "bank copy",
    "fee bill",
    "invoice",
    "receipt",
    "statement",
    "challan",
    "form",
];

static NUMBERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]").unwrap());

static NUMERIC_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s,$€£¥]+$").unwrap());

static NUMERIC_TABLE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s,$€£¥:-]+$").unwrap());

static TITLE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:copy|form|bill|statement|invoice|receipt)[\s:]+").unwrap());

/// Infer a short label for a detected table from its surrounding text.
///
/// Scans the first lines of the normalized chunk text, skipping separator
/// rows, numbered-list markers, and pure numeric/currency lines; prefers
/// lines carrying document-section vocabulary. Falls back to the first
/// usable non-table line, then to the literal `"Table"`. Never fails.
pub fn infer_title(raw_text: &str) -> String {
    let normalized = normalize(raw_text);
    let lines: Vec<&str> = normalized.lines().collect();

    for line in lines.iter().take(10) {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || is_pipe_separator(trimmed)
            || NUMBERED_ITEM_RE.is_match(trimmed)
            || NUMERIC_LINE_RE.is_match(trimmed)
        {
            continue;
        }
        let lower = trimmed.to_ascii_lowercase();
        if TITLE_KEYWORDS.iter().any(|k| lower.contains(k)) || trimmed.len() > 5 {
            let cleaned = TITLE_PREFIX_RE.replace(trimmed, "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return truncate(trimmed);
            }
            return truncate(cleaned);
        }
    }

    // Fallback: first non-empty line that is neither tabular nor numeric.
    for line in lines.iter().take(15) {
        let trimmed = line.trim();
        if !trimmed.is_empty()
            && !trimmed.contains('|')
            && !NUMERIC_TABLE_LINE_RE.is_match(trimmed)
        {
            return truncate(trimmed);
        }
    }

    "Table".to_string()
}

/// A markdown separator row: pipes around nothing but dashes and colons.
fn is_pipe_separator(line: &str) -> bool {
    line.contains('|')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_TITLE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_line_preferred() {
        let text = "123\nUniversity Copy\nTuition 54,000";
        assert_eq!(infer_title(text), "University Copy");
    }

    #[test]
    fn test_prefix_stripped() {
        assert_eq!(infer_title("Invoice: Quarterly Services"), "Quarterly Services");
        assert_eq!(infer_title("Statement of Operations"), "of Operations".to_string());
    }

    #[test]
    fn test_separator_and_numeric_lines_skipped() {
        let text = "|---|---|\n$1,200\nFee Bill Spring 2024";
        assert_eq!(infer_title(text), "Fee Bill Spring 2024");
    }

    #[test]
    fn test_numbered_items_skipped() {
        let text = "1. first item\n2) second item\nPayment Schedule";
        assert_eq!(infer_title(text), "Payment Schedule");
    }

    #[test]
    fn test_default_title() {
        assert_eq!(infer_title(""), "Table");
        assert_eq!(infer_title("1,200\n540"), "Table");
    }

    #[test]
    fn test_truncated_to_limit() {
        let long = "x".repeat(400);
        assert_eq!(infer_title(&long).chars().count(), 120);
    }
}
