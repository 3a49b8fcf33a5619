//! Human-readable digest of a mapped document.

use crate::model::DocumentData;

/// Render a short summary of metadata and key metrics.
///
/// One heading line naming the document type, company, and date (when
/// resolved), followed by a bullet per extracted metric. Never fails.
pub fn render_summary(doc: &DocumentData) -> String {
    let metadata = &doc.metadata;
    let mut summary = if metadata.date_resolved() {
        format!(
            "{} for {} dated {}.\n\n",
            metadata.document_type, metadata.company_name, metadata.document_date
        )
    } else {
        format!(
            "{} for {}.\n\n",
            metadata.document_type, metadata.company_name
        )
    };

    if !doc.key_metrics.is_empty() {
        summary.push_str("Key financial metrics:\n");
        for metric in &doc.key_metrics {
            let formatted = if metric.unit == "USD" {
                format_usd(metric.value)
            } else {
                format!("{} {}", format_grouped(metric.value), metric.unit)
            };
            summary.push_str(&format!("- {}: {}\n", metric.name, formatted));
        }
    }

    summary
}

fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_grouped(value.abs()))
    } else {
        format!("${}", format_grouped(value))
    }
}

/// Format with thousands separators and two decimal places.
fn format_grouped(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
