//! Detected table types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis-aligned bounding box carried over from upstream grounding info.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
}

/// A table reconstructed from one source chunk or from the aggregate markup.
///
/// Invariants:
/// - when `rows` is non-empty, `header` is non-empty (a synthetic header is
///   generated if the source had none);
/// - every row key is either a header column name or a positional `col_N`
///   name for cells beyond the header width;
/// - `id` is unique within one document (chunk id, or a positional fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Stable identity key (chunk id or positional fallback)
    pub id: String,

    /// Best-effort short label inferred from surrounding text
    pub title: String,

    /// Ordered column names
    pub header: Vec<String>,

    /// Data rows, keyed by column name
    pub rows: Vec<BTreeMap<String, String>>,

    /// Page number from grounding, when known
    pub page: Option<u32>,

    /// Bounding box from grounding, when known
    #[serde(rename = "box")]
    pub bounds: Option<Rect>,

    /// Upstream chunk type label, or "markdown_table" for aggregate-markup tables
    pub source_type: String,
}

impl TableEntry {
    /// Create a table entry with empty header and rows.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            header: Vec::new(),
            rows: Vec::new(),
            page: None,
            bounds: None,
            source_type: "table".to_string(),
        }
    }

    /// Set header and rows, and return self.
    pub fn with_content(
        mut self,
        header: Vec<String>,
        rows: Vec<BTreeMap<String, String>>,
    ) -> Self {
        self.header = header;
        self.rows = rows;
        self
    }

    /// Set grounding info and return self.
    pub fn with_grounding(mut self, page: Option<u32>, bounds: Option<Rect>) -> Self {
        self.page = page;
        self.bounds = bounds;
        self
    }

    /// Set the source type label and return self.
    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    /// Get the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Check if the table carries no structure at all.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Check the header invariant: rows imply a non-empty header, and every
    /// row key is a header name or a positional overflow name.
    pub fn header_is_valid(&self) -> bool {
        if self.rows.is_empty() {
            return true;
        }
        if self.header.is_empty() {
            return false;
        }
        self.rows.iter().all(|row| {
            row.keys()
                .all(|key| self.header.iter().any(|col| col == key) || key.starts_with("col_"))
        })
    }

    /// Same structural content as another table (header and rows equal).
    pub fn same_content(&self, header: &[String], rows: &[BTreeMap<String, String>]) -> bool {
        self.header == header && self.rows == rows
    }
}
