//! Statement-section line scanners and plain-text fallbacks.
//!
//! These run over normalized chunk text that the statement vocabulary in
//! `KeywordPolicy` has already routed; each scanner walks lines and lifts
//! well-known line items into the matching bucket.

use crate::model::{DocumentData, Metric};
use crate::parser::extract_number_with_threshold;

/// Scan income-statement text for revenue, net income, and gross profit.
pub fn scan_income_statement(text: &str, doc: &mut DocumentData, min_magnitude: f64) {
    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.contains("revenue") || lower.contains("sales") {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_income_statement("revenue", value);
                doc.add_metric(Metric::new("Revenue", value));
            }
        } else if lower.contains("net income")
            || lower.contains("net profit")
            || lower.contains("net earnings")
        {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_income_statement("net_income", value);
                doc.add_metric(Metric::new("Net Income", value));
            }
        } else if lower.contains("gross profit") || lower.contains("gross margin") {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_income_statement("gross_profit", value);
                doc.add_metric(Metric::new("Gross Profit", value));
            }
        }
    }
}

/// Scan balance-sheet text for total assets, liabilities, and equity.
pub fn scan_balance_sheet(text: &str, doc: &mut DocumentData, min_magnitude: f64) {
    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.contains("total assets") {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_balance_sheet("total_assets", value);
                doc.add_metric(Metric::new("Total Assets", value));
            }
        } else if lower.contains("total liabilities") {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_balance_sheet("total_liabilities", value);
                doc.add_metric(Metric::new("Total Liabilities", value));
            }
        } else if lower.contains("total equity") || lower.contains("shareholders' equity") {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_balance_sheet("total_equity", value);
                doc.add_metric(Metric::new("Total Equity", value));
            }
        }
    }
}

/// Scan cash-flow text for operating, investing, and financing flows.
pub fn scan_cash_flow(text: &str, doc: &mut DocumentData, min_magnitude: f64) {
    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.contains("operating activities") || lower.contains("cash flow from operations") {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_cash_flow("operating_cash_flow", value);
                doc.add_metric(Metric::new("Operating Cash Flow", value));
            }
        } else if lower.contains("investing activities")
            || lower.contains("cash flow from investing")
        {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_cash_flow("investing_cash_flow", value);
                doc.add_metric(Metric::new("Investing Cash Flow", value));
            }
        } else if lower.contains("financing activities")
            || lower.contains("cash flow from financing")
        {
            if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                doc.set_cash_flow("financing_cash_flow", value);
                doc.add_metric(Metric::new("Financing Cash Flow", value));
            }
        }
    }
}

/// Find the first number on a line containing any of the given keywords.
///
/// Plain-text fallback used when no statement data came out of tables.
pub fn find_keyword_metric(text: &str, keywords: &[String], min_magnitude: f64) -> Option<f64> {
    for line in text.lines() {
        let lower = line.to_lowercase();
        for keyword in keywords {
            if lower.contains(keyword.as_str()) {
                if let Some(value) = extract_number_with_threshold(line, min_magnitude) {
                    return Some(value);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DEFAULT_MIN_MAGNITUDE;

    #[test]
    fn test_scan_income_statement() {
        let text = "Income Statement\nTotal revenue 5,000,000\nNet income 1,200,000";
        let mut doc = DocumentData::new();
        scan_income_statement(text, &mut doc, DEFAULT_MIN_MAGNITUDE);

        assert_eq!(doc.income_statement["revenue"], 5_000_000.0);
        assert_eq!(doc.income_statement["net_income"], 1_200_000.0);
        assert!(doc.has_metric("Revenue"));
        assert!(doc.has_metric("Net Income"));
    }

    #[test]
    fn test_scan_balance_sheet() {
        let text = "Total assets 2,500,000\nTotal liabilities 1,000,000\nTotal equity 1,500,000";
        let mut doc = DocumentData::new();
        scan_balance_sheet(text, &mut doc, DEFAULT_MIN_MAGNITUDE);

        assert_eq!(doc.balance_sheet["total_assets"], 2_500_000.0);
        assert_eq!(doc.balance_sheet["total_liabilities"], 1_000_000.0);
        assert_eq!(doc.balance_sheet["total_equity"], 1_500_000.0);
    }

    #[test]
    fn test_scan_cash_flow_signs() {
        let text = "Net cash from operating activities 800,000\n\
                    Cash used in investing activities (300,000)";
        let mut doc = DocumentData::new();
        scan_cash_flow(text, &mut doc, DEFAULT_MIN_MAGNITUDE);

        assert_eq!(doc.cash_flow["operating_cash_flow"], 800_000.0);
        assert_eq!(doc.cash_flow["investing_cash_flow"], -300_000.0);
    }

    #[test]
    fn test_find_keyword_metric() {
        let keywords = vec!["revenue".to_string(), "net sales".to_string()];
        let text = "Overview\nNet sales for the year 3,400,000\nOther 12";

        let value = find_keyword_metric(text, &keywords, DEFAULT_MIN_MAGNITUDE);
        assert_eq!(value, Some(3_400_000.0));

        assert_eq!(
            find_keyword_metric("nothing here", &keywords, DEFAULT_MIN_MAGNITUDE),
            None
        );
    }
}
