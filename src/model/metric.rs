//! Financial metric types.

use serde::{Deserialize, Serialize};

/// Default unit assigned to extracted metrics.
pub const DEFAULT_UNIT: &str = "USD";

/// Default reporting-period label assigned to extracted metrics.
pub const DEFAULT_PERIOD: &str = "Current Period";

/// A single named financial figure extracted from a document.
///
/// Metric names are unique per document under case-insensitive comparison;
/// the first extraction wins and later duplicates are dropped by
/// [`DocumentData::add_metric`](crate::model::DocumentData::add_metric).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric name (e.g. "Total Assets")
    pub name: String,

    /// Numeric value, sign-adjusted for accounting notation
    pub value: f64,

    /// Currency or unit label
    pub unit: String,

    /// Reporting period label
    pub period: String,

    /// Table title or chunk id the metric was extracted from
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source: Option<String>,
}

impl Metric {
    /// Create a metric with the default unit and period.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: DEFAULT_UNIT.to_string(),
            period: DEFAULT_PERIOD.to_string(),
            source: None,
        }
    }

    /// Set the unit and return self.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the period and return self.
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    /// Set the source and return self.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Case-insensitive name comparison.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_defaults() {
        let metric = Metric::new("Revenue", 1_500_000.0);
        assert_eq!(metric.unit, "USD");
        assert_eq!(metric.period, "Current Period");
        assert!(metric.source.is_none());
    }

    #[test]
    fn test_metric_builder() {
        let metric = Metric::new("Total Fee", 5_400.0)
            .with_unit("EUR")
            .with_period("FY2023")
            .with_source("Fee Bill");

        assert_eq!(metric.unit, "EUR");
        assert_eq!(metric.period, "FY2023");
        assert_eq!(metric.source.as_deref(), Some("Fee Bill"));
    }

    #[test]
    fn test_name_matches_is_case_insensitive() {
        let metric = Metric::new("Net Income", 250_000.0);
        assert!(metric.name_matches("net income"));
        assert!(metric.name_matches("NET INCOME"));
        assert!(!metric.name_matches("Net Revenue"));
    }
}
