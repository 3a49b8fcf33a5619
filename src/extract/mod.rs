//! Metric extraction from reconstructed tables.
//!
//! Walks table rows for label/value pairs matching the keyword policy and
//! routes recognized totals into the coarse statement buckets. All writes
//! go through the [`DocumentData`] builder methods, which enforce the
//! first-wins metric uniqueness invariant.

mod keywords;
mod statements;

pub use keywords::{KeywordPolicy, StatementSection};
pub use statements::{
    find_keyword_metric, scan_balance_sheet, scan_cash_flow, scan_income_statement,
};

use crate::model::{DocumentData, Metric, TableEntry};
use crate::parser::extract_number_with_threshold;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Leading list numbering on a row label ("1.", "2)").
static LABEL_NUMBERING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]?\s*").unwrap());

/// Strip leading numbering and stray punctuation from a row label.
pub fn clean_label(label: &str) -> String {
    let cleaned = LABEL_NUMBERING_RE.replace(label.trim(), "");
    cleaned.trim_matches(':').trim().to_string()
}

/// First numeric value in a row, preferring right-most header columns.
///
/// Header columns are scanned right-to-left (the right-most column usually
/// holds the most recent period), then any remaining row keys in order.
pub fn row_value(
    row: &BTreeMap<String, String>,
    header: &[String],
    min_magnitude: f64,
) -> Option<f64> {
    let mut search_order: Vec<&String> = header.iter().rev().collect();
    for key in row.keys() {
        if !search_order.contains(&key) {
            search_order.push(key);
        }
    }

    for column in search_order {
        let cell = match row.get(column) {
            Some(cell) if !cell.is_empty() => cell,
            _ => continue,
        };
        if let Some(value) = extract_number_with_threshold(cell, min_magnitude) {
            return Some(value);
        }
    }
    None
}

/// Extract metrics from one reconstructed table into the document record.
///
/// Rows whose label misses the policy's keyword set, or that carry no
/// qualifying number, are skipped. Classification is first-match-wins:
/// total assets/liabilities/equity land in the balance sheet, operating
/// cash in the cash-flow bucket, revenue-like labels become income
/// line items, everything else a plain metric.
pub fn extract_table_metrics(
    table: &TableEntry,
    doc: &mut DocumentData,
    policy: &KeywordPolicy,
    min_magnitude: f64,
) {
    let source = if table.title.is_empty() {
        table.id.clone()
    } else {
        table.title.clone()
    };

    for row in &table.rows {
        let label = table
            .header
            .first()
            .and_then(|column| row.get(column))
            .cloned()
            .or_else(|| row.values().next().cloned())
            .unwrap_or_default();
        let cleaned = clean_label(&label);
        if cleaned.is_empty() {
            continue;
        }

        let lower = cleaned.to_lowercase();
        if !policy.label_qualifies(&lower) {
            continue;
        }
        let value = match row_value(row, &table.header, min_magnitude) {
            Some(value) => value,
            None => continue,
        };

        let metric = |name: &str| Metric::new(name, value).with_source(source.clone());
        if lower.contains("asset") && lower.contains("total") {
            doc.set_balance_sheet("total_assets", value);
            doc.add_metric(metric("Total Assets"));
        } else if lower.contains("liabil") && lower.contains("total") {
            doc.set_balance_sheet("total_liabilities", value);
            doc.add_metric(metric("Total Liabilities"));
        } else if lower.contains("equity") && lower.contains("total") {
            doc.set_balance_sheet("total_equity", value);
            doc.add_metric(metric("Total Equity"));
        } else if lower.contains("cash") && (lower.contains("flow") || lower.contains("operating"))
        {
            doc.set_cash_flow("operating_cash_flow", value);
            doc.add_metric(metric("Operating Cash Flow"));
        } else if lower.contains("revenue") || lower.contains("sales") || lower.contains("income")
        {
            doc.set_income_statement(format!("line_item:{cleaned}"), value);
            doc.add_metric(metric(&cleaned));
        } else {
            doc.add_metric(metric(&cleaned));
        }
    }
}
