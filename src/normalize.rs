//! Markup-to-plain-text normalization.
//!
//! Upstream chunk content arrives as markup-heavy text with no guaranteed
//! shape: HTML table fragments, markdown, or plain lines. This module turns
//! any of it into clean newline-separated text that the table reconstructor
//! and metric extractors can scan. Passes run in a fixed order: line-ending
//! normalization before tag substitution, tag stripping before entity
//! decoding so decoded angle brackets survive, whitespace collapse last.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Structural tags that terminate a visual line: `<br>`, closing table row
/// and table tags, closing paragraph.
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*(?:br|/tr|/table|/p)\s*/?>").unwrap());

/// Any remaining tag-like span.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Runs of blank lines.
static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Runs of horizontal whitespace.
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Convert markup-heavy chunk content into plain text lines.
///
/// Never fails on malformed markup; the worst case is the input with
/// tag-like substrings removed. Idempotent for already-normalized text.
///
/// # Example
///
/// ```
/// use finsift::normalize::normalize;
///
/// let text = normalize("<tr><td>Total&nbsp;Fee</td><td>5,400</td></tr>");
/// assert_eq!(text, "Total Fee 5,400");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = standardize_line_endings(raw);
    let text = LINE_BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text: String = text.nfc().collect();
    let text = HSPACE_RE.replace_all(&text, " ");
    // Trim lines before collapsing blank runs so whitespace-only lines
    // count as blank.
    let text = trim_lines(&text);
    let text = BLANK_LINE_RE.replace_all(&text, "\n");

    text.trim().to_string()
}

fn standardize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input)
        .replace('\u{a0}', " ")
}

fn trim_lines(input: &str) -> String {
    input.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_rows_become_lines() {
        let raw = "<table><tr><td>Revenue</td><td>1,000</td></tr><tr><td>Fees</td><td>500</td></tr></table>";
        let text = normalize(raw);
        assert_eq!(text, "Revenue 1,000\nFees 500");
    }

    #[test]
    fn test_br_and_paragraph_breaks() {
        assert_eq!(normalize("one<br/>two</p>three"), "one\ntwo\nthree");
        assert_eq!(normalize("a< BR >b"), "a\nb");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(normalize("Fees &amp; Charges&nbsp;&nbsp;500"), "Fees & Charges 500");
    }

    #[test]
    fn test_line_endings_standardized() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\nb");
        assert_eq!(normalize("a   \t  b"), "a b");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n  \n"), "");
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let text = normalize("<table><tr><td>unclosed");
        assert_eq!(text, "unclosed");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "<table><tr><th>Item</th><th>Amount</th></tr></table>",
            "Total Assets  1,000,000\r\nNet Income (500)",
            "Fees &amp; Charges<br>Balance: 1,200 Dr",
            "| Item | Amount |\n|---|---|\n| Fee | 540 |",
            "first\n   \nsecond",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
