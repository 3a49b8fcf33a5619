//! JSON rendering for mapped document records.

use crate::error::{Error, Result};
use crate::model::DocumentData;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document record to JSON.
pub fn to_json(doc: &DocumentData, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metric;

    #[test]
    fn test_to_json_pretty() {
        let mut doc = DocumentData::new();
        doc.metadata.resolve_company("Acme Corp");
        doc.add_metric(Metric::new("Revenue", 1_000_000.0));

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"company_name\""));
        assert!(json.contains("Acme Corp"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let doc = DocumentData::new();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"key_metrics\":[]"));
    }

    #[test]
    fn test_round_trips_through_serde() {
        let mut doc = DocumentData::new();
        doc.set_balance_sheet("total_assets", 1_000_000.0);

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        let back: DocumentData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.balance_sheet["total_assets"], 1_000_000.0);
    }
}
