//! Document-level types.

use super::{Metric, Rect, TableEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder company name before a heuristic resolves it.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Placeholder document date before a heuristic resolves it.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Placeholder document type before a heuristic resolves it.
pub const UNKNOWN_TYPE: &str = "Document";

/// Document-level metadata inferred from text heuristics.
///
/// Each field starts at its placeholder and is overwritten at most once, by
/// the first heuristic that matches; later candidates never clobber a
/// resolved field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Issuing company or organization
    pub company_name: String,

    /// Document date, carried verbatim from the matched text
    pub document_date: String,

    /// Coarse document type (e.g. "Invoice", "Balance Sheet")
    pub document_type: String,
}

impl DocumentMetadata {
    /// Whether the company name has been resolved from its placeholder.
    pub fn company_resolved(&self) -> bool {
        self.company_name != UNKNOWN_COMPANY
    }

    /// Whether the document date has been resolved from its placeholder.
    pub fn date_resolved(&self) -> bool {
        self.document_date != UNKNOWN_DATE
    }

    /// Whether the document type has been resolved from its placeholder.
    pub fn type_resolved(&self) -> bool {
        self.document_type != UNKNOWN_TYPE
    }

    /// Set the company name unless already resolved.
    pub fn resolve_company(&mut self, name: impl Into<String>) {
        if !self.company_resolved() {
            self.company_name = name.into();
        }
    }

    /// Set the document date unless already resolved.
    pub fn resolve_date(&mut self, date: impl Into<String>) {
        if !self.date_resolved() {
            self.document_date = date.into();
        }
    }

    /// Set the document type unless already resolved.
    pub fn resolve_type(&mut self, kind: impl Into<String>) {
        if !self.type_resolved() {
            self.document_type = kind.into();
        }
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            company_name: UNKNOWN_COMPANY.to_string(),
            document_date: UNKNOWN_DATE.to_string(),
            document_type: UNKNOWN_TYPE.to_string(),
        }
    }
}

/// Normalized view of one input chunk, kept for downstream visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSnapshot {
    /// Upstream chunk id
    pub id: String,

    /// Upstream chunk type label
    #[serde(rename = "type")]
    pub kind: String,

    /// Normalized plain text
    pub text: String,

    /// Original markup, kept for table rendering
    pub raw_markup: String,

    /// Page number from grounding
    pub page: Option<u32>,

    /// Bounding box from grounding
    #[serde(rename = "box")]
    pub bounds: Option<Rect>,
}

/// The normalized financial-data record produced by the mapper.
///
/// Created fresh per document, populated in a single pass over chunks plus
/// one pass over the aggregate markup, then handed off immutable. The three
/// statement buckets are sparse mappings of well-known snake_case keys
/// (`revenue`, `total_assets`, `operating_cash_flow`, ...) to numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    /// Inferred document metadata
    pub metadata: DocumentMetadata,

    /// Income-statement bucket
    pub income_statement: BTreeMap<String, f64>,

    /// Balance-sheet bucket
    pub balance_sheet: BTreeMap<String, f64>,

    /// Cash-flow bucket
    pub cash_flow: BTreeMap<String, f64>,

    /// Deduplicated named metrics, first extraction wins
    pub key_metrics: Vec<Metric>,

    /// Tables detected across chunks and the aggregate markup
    pub tables: Vec<TableEntry>,

    /// Normalized chunk snapshots for downstream visualization
    pub detected_chunks: Vec<ChunkSnapshot>,

    /// Human-readable digest of metadata and metrics
    pub summary: String,
}

impl DocumentData {
    /// Create an empty record with placeholder metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal valid record returned when mapping fails at the outer
    /// boundary: default metadata, empty collections, explanatory summary.
    pub fn minimal(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Whether a metric with this name exists (case-insensitive).
    pub fn has_metric(&self, name: &str) -> bool {
        self.key_metrics.iter().any(|m| m.name_matches(name))
    }

    /// Append a metric unless one with the same name already exists.
    ///
    /// Returns `true` if the metric was added.
    pub fn add_metric(&mut self, metric: Metric) -> bool {
        if self.has_metric(&metric.name) {
            return false;
        }
        self.key_metrics.push(metric);
        true
    }

    /// Append a table unless one with the same identity key already exists.
    ///
    /// Returns `true` if the table was added.
    pub fn add_table(&mut self, table: TableEntry) -> bool {
        if self.tables.iter().any(|t| t.id == table.id) {
            return false;
        }
        self.tables.push(table);
        true
    }

    /// Whether any stored table has this exact header and row content.
    pub fn has_table_content(
        &self,
        header: &[String],
        rows: &[BTreeMap<String, String>],
    ) -> bool {
        self.tables.iter().any(|t| t.same_content(header, rows))
    }

    /// Write an income-statement bucket value.
    pub fn set_income_statement(&mut self, key: impl Into<String>, value: f64) {
        self.income_statement.insert(key.into(), value);
    }

    /// Write a balance-sheet bucket value.
    pub fn set_balance_sheet(&mut self, key: impl Into<String>, value: f64) {
        self.balance_sheet.insert(key.into(), value);
    }

    /// Write a cash-flow bucket value.
    pub fn set_cash_flow(&mut self, key: impl Into<String>, value: f64) {
        self.cash_flow.insert(key.into(), value);
    }

    /// Whether both the income statement and balance sheet are still empty.
    pub fn statements_empty(&self) -> bool {
        self.income_statement.is_empty() && self.balance_sheet.is_empty()
    }
}
