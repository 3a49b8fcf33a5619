//! # finsift
//!
//! Financial-data extraction from document-intelligence parse output.
//!
//! This library ingests the chunked, markup-heavy response of an external
//! document-parsing API and converts it into a normalized, queryable
//! record: typed metadata, reconstructed tables, and a deduplicated list
//! of named financial metrics with coarse statement buckets.
//!
//! ## Quick Start
//!
//! ```
//! use finsift::map_value;
//! use serde_json::json;
//!
//! let response = json!({
//!     "chunks": [{
//!         "id": "chunk-0",
//!         "type": "table",
//!         "markdown": "<table><tr><th>Item</th><th>Amount</th></tr>\
//!                      <tr><td>Total Assets</td><td>1,000,000</td></tr></table>"
//!     }]
//! });
//!
//! let doc = map_value(&response, "");
//! assert_eq!(doc.balance_sheet["total_assets"], 1_000_000.0);
//! assert!(doc.has_metric("Total Assets"));
//! ```
//!
//! ## Features
//!
//! - **Defensive decoding**: the upstream response has no guaranteed
//!   schema; every field degrades to empty rather than failing
//! - **Multi-strategy table reconstruction**: HTML, pipe-delimited, and
//!   whitespace-aligned markup
//! - **Accounting notation**: parenthesized negatives, thousands
//!   separators, Dr/Cr markers
//! - **Configurable classification**: keyword policy as data, threaded
//!   through explicit options
//! - **Never fatal**: the worst outcome of a malformed document is an
//!   under-populated record

pub mod error;
pub mod extract;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{KeywordPolicy, StatementSection};
pub use mapper::{MapOptions, SchemaMapper};
pub use model::{
    ChunkSnapshot, DocumentData, DocumentMetadata, Metric, Rect, TableEntry,
};
pub use parser::{Chunk, ChunkType, Grounding, ParseResponse};
pub use render::{render_summary, to_json, JsonFormat};

/// Map a decoded parse response into a document record with default
/// options.
///
/// `full_text` is the full document text used by the fallback pass and
/// document-type inference; pass `""` to fall back to the combined chunk
/// text.
pub fn map_response(response: &ParseResponse, full_text: &str) -> DocumentData {
    SchemaMapper::new().map(response, full_text)
}

/// Map a raw response value, decoding it defensively first.
///
/// A value that cannot be decoded yields a minimal valid record rather
/// than an error, so downstream consumers always receive a well-formed
/// record.
pub fn map_value(value: &serde_json::Value, full_text: &str) -> DocumentData {
    SchemaMapper::new().map_value(value, full_text)
}

/// Map plain document text by synthesizing a stub parse response first.
///
/// # Example
///
/// ```
/// let doc = finsift::map_text("Balance Sheet\nTotal assets 2,500,000");
/// assert_eq!(doc.balance_sheet["total_assets"], 2_500_000.0);
/// ```
pub fn map_text(text: &str) -> DocumentData {
    let response = parser::stub_response(text);
    SchemaMapper::new().map(&response, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_value_end_to_end() {
        let response = json!({
            "metadata": {"company_name": "Acme Corp"},
            "chunks": [{
                "id": "chunk-0",
                "type": "table",
                "markdown": "<table><tr><th>Item</th><th>Amount</th></tr>\
                             <tr><td>Total Assets</td><td>1,000,000</td></tr></table>"
            }]
        });

        let doc = map_value(&response, "");
        assert_eq!(doc.metadata.company_name, "Acme Corp");
        assert_eq!(doc.tables.len(), 1);
        assert!(doc.summary.contains("Total Assets"));
    }

    #[test]
    fn test_map_text_stub_path() {
        let doc = map_text("Quarterly Statement\nIncome Statement\nTotal revenue 4,000,000");
        assert_eq!(doc.income_statement["revenue"], 4_000_000.0);
        assert!(doc.has_metric("Revenue"));
    }

    #[test]
    fn test_map_value_never_panics_on_junk() {
        for value in [json!(null), json!(42), json!([]), json!({"chunks": "nope"})] {
            let doc = map_value(&value, "");
            assert_eq!(doc.metadata.document_date, "Unknown Date");
        }
    }
}
