//! Keyword tables driving metric classification.
//!
//! The classification policy is data, not branching logic: callers can
//! swap or extend these lists through
//! [`MapOptions`](crate::mapper::MapOptions) without touching the parsing
//! mechanics.

/// A coarse financial-statement section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementSection {
    /// Income statement / statement of operations
    Income,
    /// Balance sheet / statement of financial position
    Balance,
    /// Cash-flow statement
    CashFlow,
}

/// Keyword lists used to qualify metric labels and route statement text.
#[derive(Debug, Clone)]
pub struct KeywordPolicy {
    /// A table-row label must contain one of these to become a metric.
    /// Stems are allowed ("liabil" matches both liability and liabilities).
    pub metric_keywords: Vec<String>,

    /// Chunk-level vocabulary marking income-statement sections.
    pub income_section: Vec<String>,

    /// Chunk-level vocabulary marking balance-sheet sections.
    pub balance_section: Vec<String>,

    /// Chunk-level vocabulary marking cash-flow sections.
    pub cashflow_section: Vec<String>,

    /// Plain-text fallback keywords for revenue.
    pub revenue_keywords: Vec<String>,

    /// Plain-text fallback keywords for net income.
    pub net_income_keywords: Vec<String>,

    /// Plain-text fallback keywords for total assets.
    pub total_assets_keywords: Vec<String>,

    /// Plain-text fallback keywords for operating cash flow.
    pub operating_cash_keywords: Vec<String>,

    /// Plain-text keywords for the fee-amount probe.
    pub fee_keywords: Vec<String>,
}

impl KeywordPolicy {
    /// Whether a lowercased row label qualifies for metric extraction.
    pub fn label_qualifies(&self, label_lower: &str) -> bool {
        self.metric_keywords
            .iter()
            .any(|keyword| label_lower.contains(keyword.as_str()))
    }

    /// Route lowercased chunk text to a statement section, if any.
    ///
    /// Income vocabulary is checked first, then balance sheet, then cash
    /// flow; the first section with a match wins.
    pub fn section_of(&self, text_lower: &str) -> Option<StatementSection> {
        let matches = |terms: &[String]| terms.iter().any(|t| text_lower.contains(t.as_str()));
        if matches(&self.income_section) {
            Some(StatementSection::Income)
        } else if matches(&self.balance_section) {
            Some(StatementSection::Balance)
        } else if matches(&self.cashflow_section) {
            Some(StatementSection::CashFlow)
        } else {
            None
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            metric_keywords: strings(&[
                "total",
                "premium",
                "dividend",
                "balance",
                "fee",
                "asset",
                "liabil",
                "equity",
                "cash",
                "revenue",
                "income",
                "sales",
                "payment",
                "adjustment",
            ]),
            income_section: strings(&[
                "income statement",
                "statement of operations",
                "profit and loss",
            ]),
            balance_section: strings(&[
                "balance sheet",
                "financial position",
                "assets",
                "liabilities",
            ]),
            cashflow_section: strings(&[
                "cash flow",
                "statement of cash flows",
                "operating activities",
            ]),
            revenue_keywords: strings(&["revenue", "net sales", "total revenue"]),
            net_income_keywords: strings(&["net income", "net earnings", "net profit"]),
            total_assets_keywords: strings(&["total assets"]),
            operating_cash_keywords: strings(&[
                "cash flow from operations",
                "operating cash flow",
                "net cash provided by operating activities",
            ]),
            fee_keywords: strings(&["fee", "total fee", "amount", "total amount", "payment"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_qualifies_on_stems() {
        let policy = KeywordPolicy::default();
        assert!(policy.label_qualifies("total liabilities"));
        assert!(policy.label_qualifies("membership fee"));
        assert!(!policy.label_qualifies("page footer"));
    }

    #[test]
    fn test_section_routing_order() {
        let policy = KeywordPolicy::default();
        assert_eq!(
            policy.section_of("consolidated income statement"),
            Some(StatementSection::Income)
        );
        assert_eq!(
            policy.section_of("balance sheet as of december"),
            Some(StatementSection::Balance)
        );
        // Income vocabulary wins over later sections when both appear.
        assert_eq!(
            policy.section_of("income statement and balance sheet"),
            Some(StatementSection::Income)
        );
        assert_eq!(policy.section_of("cover letter"), None);
    }
}
