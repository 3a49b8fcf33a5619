//! Table reconstruction from heterogeneous chunk markup.
//!
//! The upstream API embeds tabular data three different ways: HTML
//! `<table>` fragments, markdown-style pipe rows, and whitespace-aligned
//! text. Strategies run as a cascade in that order; the first one that
//! yields a header or a row wins. An empty result means "no table found"
//! and is a valid outcome, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

use super::response::{Chunk, ChunkType};

/// A reconstructed data row, keyed by column name.
pub type TableRow = BTreeMap<String, String>;

/// Header cells longer than this cannot be header labels.
const MAX_HEADER_CELL_LEN: usize = 50;

/// Column-label vocabulary used to tell a real header row from a first
/// data row. Every cell of a promotable header must contain one of these
/// words; bare values like a person's name do not qualify.
const HEADER_LABEL_VOCAB: [&str; 24] = [
    "description",
    "item",
    "amount",
    "date",
    "period",
    "account",
    "particulars",
    "total",
    "quantity",
    "qty",
    "rate",
    "value",
    "balance",
    "category",
    "type",
    "name",
    "number",
    "details",
    "year",
    "fee",
    "charge",
    "debit",
    "credit",
    "field",
];

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Whether a chunk should go through table reconstruction: the upstream
/// typed it as a table, or its markup carries table structure of any kind.
pub fn looks_like_table(chunk: &Chunk) -> bool {
    chunk.kind == ChunkType::Table || has_table_markup(&chunk.raw_markup)
}

/// Whether raw markup carries any table structure (HTML tag or pipes).
pub fn has_table_markup(raw: &str) -> bool {
    contains_table_tag(raw) || raw.contains('|')
}

/// Case-insensitive check for an opening `<table` tag.
pub fn contains_table_tag(raw: &str) -> bool {
    raw.to_ascii_lowercase().contains("<table")
}

/// Reconstruct header and rows from one chunk's markup.
///
/// Tries, in order: HTML parse (only when the markup contains a table
/// tag), pipe-delimited lines, whitespace-aligned columns. Guarantees that
/// the header is non-empty whenever any row is returned.
pub fn reconstruct(raw_markup: &str, normalized_text: &str) -> (Vec<String>, Vec<TableRow>) {
    if contains_table_tag(raw_markup) {
        let (header, rows) = parse_html_table(raw_markup);
        if !header.is_empty() || !rows.is_empty() {
            log::debug!(
                "reconstructed table via HTML strategy: {} columns, {} rows",
                header.len(),
                rows.len()
            );
            return (header, rows);
        }
    }

    let lines: Vec<&str> = normalized_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some((header, rows)) = parse_pipe_table(&lines) {
        log::debug!(
            "reconstructed table via pipe strategy: {} columns, {} rows",
            header.len(),
            rows.len()
        );
        return (header, rows);
    }

    if let Some((header, rows)) = parse_whitespace_table(&lines) {
        log::debug!(
            "reconstructed table via whitespace strategy: {} columns, {} rows",
            header.len(),
            rows.len()
        );
        return (header, rows);
    }

    (Vec::new(), Vec::new())
}

/// Generate column names when the source markup has no usable header:
/// `Field`/`Value` for two-column tables, `Column N` otherwise.
pub fn synthetic_header(width: usize) -> Vec<String> {
    if width == 2 {
        vec!["Field".to_string(), "Value".to_string()]
    } else {
        (1..=width).map(|i| format!("Column {i}")).collect()
    }
}

/// Key cells by header name, with positional `col_N` names past the
/// header width.
fn row_from_cells(header: &[String], cells: Vec<String>) -> TableRow {
    cells
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| {
            let column = header
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("col_{}", idx + 1));
            (column, cell)
        })
        .collect()
}

// ── HTML strategy ────────────────────────────────────────────────────────

fn parse_html_table(raw: &str) -> (Vec<String>, Vec<TableRow>) {
    let table_sel = Selector::parse("table").unwrap();
    let thead_sel = Selector::parse("thead").unwrap();
    let tbody_sel = Selector::parse("tbody").unwrap();
    let tr_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    let fragment = Html::parse_fragment(raw);
    let table = match fragment.select(&table_sel).next() {
        Some(table) => table,
        None => return (Vec::new(), Vec::new()),
    };

    let mut header: Vec<String> = Vec::new();
    if let Some(thead) = table.select(&thead_sel).next() {
        let cells: Vec<String> = thead.select(&cell_sel).map(cell_text).collect();
        if !cells.is_empty() {
            header = cells;
        }
    }

    let tr_elements: Vec<ElementRef> = match table.select(&tbody_sel).next() {
        Some(tbody) => tbody.select(&tr_sel).collect(),
        None => table.select(&tr_sel).collect(),
    };

    let mut rows: Vec<TableRow> = Vec::new();
    for (tr_idx, tr) in tr_elements.iter().enumerate() {
        // A row of th cells is a header row: adopt it once, skip it after.
        let th_cells: Vec<String> = tr.select(&th_sel).map(cell_text).collect();
        if !th_cells.is_empty() {
            if header.is_empty() {
                header = th_cells;
            }
            continue;
        }

        // Column-spanning cells pad the row to its rendered width.
        let mut cells: Vec<String> = Vec::new();
        for cell in tr.select(&cell_sel) {
            let colspan = cell
                .value()
                .attr("colspan")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1);
            cells.push(cell_text(cell));
            for _ in 1..colspan {
                cells.push(String::new());
            }
        }
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        if header.is_empty() {
            if tr_idx == 0 && looks_like_header_cells(&cells) {
                header = cells;
                continue;
            }
            header = synthetic_header(cells.len());
        }
        rows.push(row_from_cells(&header, cells));
    }

    (header, rows)
}

fn cell_text(cell: ElementRef) -> String {
    let joined = cell.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Header cells are short descriptive labels: at least two of them, each
/// under the length cap, free of digits, and carrying column-label
/// vocabulary.
fn looks_like_header_cells(cells: &[String]) -> bool {
    cells.len() >= 2
        && cells.iter().all(|cell| {
            cell.trim().len() < MAX_HEADER_CELL_LEN
                && !cell.chars().any(|c| c.is_ascii_digit())
                && is_label_like(cell)
        })
}

fn is_label_like(cell: &str) -> bool {
    cell.to_ascii_lowercase()
        .split_whitespace()
        .any(|word| HEADER_LABEL_VOCAB.contains(&word.trim_matches(|c: char| !c.is_alphanumeric())))
}

// ── Pipe strategy ────────────────────────────────────────────────────────

fn parse_pipe_table(lines: &[&str]) -> Option<(Vec<String>, Vec<TableRow>)> {
    let pipe_lines: Vec<&str> = lines
        .iter()
        .filter(|line| line.contains('|'))
        .copied()
        .collect();
    if pipe_lines.len() < 2 {
        return None;
    }

    let mut parsed: Vec<Vec<String>> = Vec::new();
    for line in pipe_lines {
        let stripped = line.trim_matches('|').trim();
        if stripped.is_empty() || is_separator(stripped) {
            continue;
        }
        parsed.push(stripped.split('|').map(|cell| cell.trim().to_string()).collect());
    }
    if parsed.len() < 2 {
        return None;
    }

    let mut iter = parsed.into_iter();
    let header = iter.next()?;
    let rows: Vec<TableRow> = iter.map(|cells| row_from_cells(&header, cells)).collect();
    Some((header, rows))
}

fn is_separator(stripped: &str) -> bool {
    stripped.chars().all(|c| matches!(c, '-' | ':' | '|' | ' '))
}

// ── Whitespace strategy ──────────────────────────────────────────────────

fn parse_whitespace_table(lines: &[&str]) -> Option<(Vec<String>, Vec<TableRow>)> {
    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<TableRow> = Vec::new();

    for line in lines {
        let parts: Vec<String> = MULTI_SPACE_RE
            .split(line)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        if parts.len() < 2 {
            continue;
        }
        if header.is_empty() {
            header = parts;
            continue;
        }
        rows.push(row_from_cells(&header, parts));
    }

    if rows.is_empty() {
        None
    } else {
        Some((header, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn reconstruct_markup(raw: &str) -> (Vec<String>, Vec<TableRow>) {
        reconstruct(raw, &normalize(raw))
    }

    #[test]
    fn test_html_header_row() {
        let raw = "<table><tr><th>Item</th><th>Amount</th></tr>\
                   <tr><td>Total Assets</td><td>1,000,000</td></tr></table>";
        let (header, rows) = reconstruct_markup(raw);

        assert_eq!(header, vec!["Item", "Amount"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Item"], "Total Assets");
        assert_eq!(rows[0]["Amount"], "1,000,000");
    }

    #[test]
    fn test_html_thead_promoted() {
        let raw = "<table><thead><tr><td>Name</td><td>Total</td></tr></thead>\
                   <tbody><tr><td>Fees</td><td>540</td></tr></tbody></table>";
        let (header, rows) = reconstruct_markup(raw);

        assert_eq!(header, vec!["Name", "Total"]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_html_first_row_promoted_when_header_like() {
        let raw = "<table><tr><td>Description</td><td>Amount</td></tr>\
                   <tr><td>Fee</td><td>540</td></tr></table>";
        let (header, rows) = reconstruct_markup(raw);

        assert_eq!(header, vec!["Description", "Amount"]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_html_data_only_gets_field_value_header() {
        let raw = "<table><tr><td>Name</td><td>John</td></tr>\
                   <tr><td>Date</td><td>2024-01-01</td></tr></table>";
        let (header, rows) = reconstruct_markup(raw);

        // "John" is not a column label, so the first row stays data and the
        // two-column table gets the synthetic key-value header.
        assert_eq!(header, vec!["Field", "Value"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Field"], "Name");
        assert_eq!(rows[0]["Value"], "John");
    }

    #[test]
    fn test_html_numeric_first_row_synthetic_header() {
        let raw = "<table><tr><td>Opening Balance</td><td>1,500</td></tr>\
                   <tr><td>Closing Balance</td><td>2,300</td></tr></table>";
        let (header, rows) = reconstruct_markup(raw);

        assert_eq!(header, vec!["Field", "Value"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Field"], "Opening Balance");
    }

    #[test]
    fn test_html_colspan_expanded() {
        let raw = "<table><tr><th>A</th><th>B</th><th>C</th></tr>\
                   <tr><td colspan=\"2\">span</td><td>700</td></tr></table>";
        let (header, rows) = reconstruct_markup(raw);

        assert_eq!(header.len(), 3);
        assert_eq!(rows[0]["A"], "span");
        assert_eq!(rows[0]["B"], "");
        assert_eq!(rows[0]["C"], "700");
    }

    #[test]
    fn test_cascade_prefers_html_over_pipes() {
        let raw = "<table><tr><th>Col</th><th>Val</th></tr>\
                   <tr><td>x | y</td><td>900</td></tr></table>";
        let (header, _rows) = reconstruct_markup(raw);

        // Pipe fallback would have split on the literal pipe in the cell.
        assert_eq!(header, vec!["Col", "Val"]);
    }

    #[test]
    fn test_pipe_table() {
        let text = "| Item | Amount |\n|---|---|\n| Fee | 540 |\n| Fine | 120 |";
        let (header, rows) = reconstruct(text, text);

        assert_eq!(header, vec!["Item", "Amount"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["Item"], "Fine");
    }

    #[test]
    fn test_pipe_table_needs_two_content_lines() {
        let text = "| only | line |\n|---|---|";
        let (header, rows) = reconstruct(text, text);
        assert!(header.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_whitespace_table() {
        let text = "Item  Amount\nTuition Fee  54,000\nLibrary Fee  2,000";
        let (header, rows) = reconstruct(text, text);

        assert_eq!(header, vec!["Item", "Amount"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Amount"], "54,000");
    }

    #[test]
    fn test_no_table_found() {
        let text = "Just a paragraph of prose with nothing tabular.";
        let (header, rows) = reconstruct(text, text);
        assert!(header.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_header_never_empty_with_rows() {
        let samples = [
            "<table><tr><td>Opening</td><td>1,500</td></tr></table>",
            "| a | b |\n| c | d |",
            "Left  Right\n100  200",
        ];
        for raw in samples {
            let (header, rows) = reconstruct(raw, &normalize(raw));
            if !rows.is_empty() {
                assert!(!header.is_empty(), "empty header for {raw:?}");
                for row in &rows {
                    for key in row.keys() {
                        assert!(
                            header.contains(key) || key.starts_with("col_"),
                            "stray key {key} for {raw:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_synthetic_header_widths() {
        assert_eq!(synthetic_header(2), vec!["Field", "Value"]);
        assert_eq!(
            synthetic_header(3),
            vec!["Column 1", "Column 2", "Column 3"]
        );
    }

    #[test]
    fn test_malformed_html_degrades() {
        let raw = "<table><tr><td>broken";
        let (header, rows) = reconstruct(raw, &normalize(raw));
        // html5ever recovers the fragment; worst case is no table at all.
        assert!(header.len() + rows.len() <= 2);
    }

    #[test]
    fn test_looks_like_table_markers() {
        let table_chunk = Chunk {
            id: "a".into(),
            kind: ChunkType::Table,
            raw_markup: "anything".into(),
            grounding: None,
        };
        assert!(looks_like_table(&table_chunk));

        let text_chunk = Chunk {
            id: "b".into(),
            kind: ChunkType::Text,
            raw_markup: "has | pipe".into(),
            grounding: None,
        };
        assert!(looks_like_table(&text_chunk));

        let plain = Chunk {
            id: "c".into(),
            kind: ChunkType::Text,
            raw_markup: "plain prose".into(),
            grounding: None,
        };
        assert!(!looks_like_table(&plain));
    }
}
