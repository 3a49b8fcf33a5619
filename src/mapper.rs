//! Schema mapping: the orchestrator that turns a parse response into a
//! normalized [`DocumentData`] record.
//!
//! Mapping runs a fixed sequence of passes: upstream metadata adoption,
//! metadata cue scan, the chunk pass (table reconstruction plus statement
//! routing), the full-markup pass for tables only present in the aggregate
//! markdown, the plain-text fallback pass, and finally document-type
//! inference and summary rendering. The mapper never fails outright: a
//! malformed response yields a minimal valid record, and a chunk the
//! strategies cannot parse is simply not a table.

use crate::extract::{
    extract_table_metrics, find_keyword_metric, scan_balance_sheet, scan_cash_flow,
    scan_income_statement, KeywordPolicy, StatementSection,
};
use crate::model::{ChunkSnapshot, DocumentData, Metric, TableEntry};
use crate::normalize::normalize;
use crate::parser::{
    self, contains_table_tag, infer_title, looks_like_table, reconstruct, Chunk, ParseResponse,
    DEFAULT_MIN_MAGNITUDE,
};
use crate::render::render_summary;
use scraper::{Html, Selector};
use serde_json::Value;

/// Options threaded into the mapper's entry point.
///
/// Feature decisions are explicit values here, never ambient state; the
/// keyword policy is plain data so the classification behavior can be
/// tested and extended independently of the parsing mechanics.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Minimum absolute value for extracted financial figures
    pub min_magnitude: f64,

    /// Keyword classification policy
    pub keywords: KeywordPolicy,

    /// Whether to keep normalized chunk snapshots on the record
    pub chunk_snapshots: bool,
}

impl MapOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum figure magnitude.
    pub fn with_min_magnitude(mut self, min_magnitude: f64) -> Self {
        self.min_magnitude = min_magnitude;
        self
    }

    /// Replace the keyword policy.
    pub fn with_keywords(mut self, keywords: KeywordPolicy) -> Self {
        self.keywords = keywords;
        self
    }

    /// Enable or disable chunk snapshots.
    pub fn with_chunk_snapshots(mut self, keep: bool) -> Self {
        self.chunk_snapshots = keep;
        self
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            min_magnitude: DEFAULT_MIN_MAGNITUDE,
            keywords: KeywordPolicy::default(),
            chunk_snapshots: true,
        }
    }
}

/// Maps parse responses into normalized document records.
///
/// Stateless across invocations: each call allocates a fresh record, so one
/// mapper may serve concurrent documents from multiple threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaMapper {
    options: MapOptions,
}

impl SchemaMapper {
    /// Create a mapper with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper with custom options.
    pub fn with_options(options: MapOptions) -> Self {
        Self { options }
    }

    /// The options this mapper runs with.
    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Map a raw response value, decoding it defensively first.
    ///
    /// A value that cannot be decoded at all produces a minimal valid
    /// record with an explanatory summary instead of an error.
    pub fn map_value(&self, value: &Value, full_text: &str) -> DocumentData {
        match parser::decode_response(value) {
            Ok(response) => self.map(&response, full_text),
            Err(err) => {
                log::warn!("failed to decode parse response: {err}");
                DocumentData::minimal(format!("Unable to map document: {err}"))
            }
        }
    }

    /// Map a decoded response plus the full document text.
    ///
    /// `full_text` feeds the fallback pass and document-type inference;
    /// when empty, the combined chunk text stands in for it.
    pub fn map(&self, response: &ParseResponse, full_text: &str) -> DocumentData {
        let full_text = if full_text.is_empty() {
            response.combined_text()
        } else {
            full_text.to_string()
        };

        let mut doc = DocumentData::new();
        self.adopt_upstream_metadata(response, &mut doc);
        self.scan_metadata_cues(response, &mut doc);
        self.chunk_pass(response, &mut doc);
        self.full_markup_pass(response, &mut doc);
        self.fallback_pass(&full_text, &mut doc);
        self.infer_document_type(&full_text, &mut doc);

        if doc.tables.is_empty() {
            log::debug!("no tables detected in document");
        } else {
            log::debug!("detected {} table(s)", doc.tables.len());
        }

        if self.options.chunk_snapshots {
            doc.detected_chunks = snapshots(response);
        }
        doc.summary = render_summary(&doc);
        doc
    }

    /// Adopt metadata the upstream already resolved, defaults-only.
    fn adopt_upstream_metadata(&self, response: &ParseResponse, doc: &mut DocumentData) {
        let metadata = match &response.metadata {
            Some(metadata) => metadata,
            None => return,
        };
        let field = |key: &str| metadata.get(key).and_then(Value::as_str);

        if let Some(company) = field("company_name") {
            doc.metadata.resolve_company(company);
        }
        if let Some(date) = field("document_date") {
            doc.metadata.resolve_date(date);
        }
        if let Some(kind) = field("document_type") {
            doc.metadata.resolve_type(kind);
        }
    }

    /// Walk chunk text once for company-name and date cues; each field is
    /// resolved at most once.
    fn scan_metadata_cues(&self, response: &ParseResponse, doc: &mut DocumentData) {
        for chunk in &response.chunks {
            let text = chunk.normalized_text();
            if text.is_empty() {
                continue;
            }
            let lower = text.to_lowercase();

            if !doc.metadata.company_resolved()
                && (lower.contains("company")
                    || lower.contains("corporation")
                    || lower.contains("inc"))
            {
                let candidate = text.lines().map(str::trim).find(|line| {
                    let line_lower = line.to_lowercase();
                    line.len() > 5
                        && ["inc", "corp", "ltd", "llc"]
                            .iter()
                            .any(|term| line_lower.contains(term))
                });
                if let Some(line) = candidate {
                    doc.metadata.resolve_company(line);
                }
            }

            if !doc.metadata.date_resolved()
                && (lower.contains("date") || lower.contains("period") || lower.contains("quarter"))
            {
                let candidate = text.lines().map(str::trim).find(|line| {
                    let line_lower = line.to_lowercase();
                    (line_lower.contains("quarter") || line_lower.contains("period"))
                        && (line_lower.contains("ended") || line_lower.contains("ending"))
                });
                if let Some(line) = candidate {
                    doc.metadata.resolve_date(line);
                }
            }
        }
    }

    /// Classify every chunk, reconstruct table-like ones, and route
    /// statement-section text to the line scanners.
    fn chunk_pass(&self, response: &ParseResponse, doc: &mut DocumentData) {
        for chunk in &response.chunks {
            let text = chunk.normalized_text();
            if chunk.raw_markup.is_empty() && text.is_empty() {
                continue;
            }

            if looks_like_table(chunk) {
                self.process_table_chunk(chunk, &text, doc);
            }

            match self.options.keywords.section_of(&text.to_lowercase()) {
                Some(StatementSection::Income) => {
                    scan_income_statement(&text, doc, self.options.min_magnitude)
                }
                Some(StatementSection::Balance) => {
                    scan_balance_sheet(&text, doc, self.options.min_magnitude)
                }
                Some(StatementSection::CashFlow) => {
                    scan_cash_flow(&text, doc, self.options.min_magnitude)
                }
                None => {}
            }
        }
    }

    fn process_table_chunk(&self, chunk: &Chunk, text: &str, doc: &mut DocumentData) {
        let (header, rows) = reconstruct(&chunk.raw_markup, text);
        if header.is_empty() && rows.is_empty() {
            log::debug!("chunk {:?}: strategy cascade found no table", chunk.id);
            return;
        }

        let table_id = if chunk.id.is_empty() {
            format!("table-{}", doc.tables.len())
        } else {
            chunk.id.clone()
        };
        if doc.tables.iter().any(|t| t.id == table_id) {
            return;
        }

        let title_source = if chunk.raw_markup.is_empty() {
            text
        } else {
            chunk.raw_markup.as_str()
        };
        let entry = TableEntry::new(table_id, infer_title(title_source))
            .with_content(header, rows)
            .with_grounding(chunk.page(), chunk.bounds())
            .with_source_type(chunk.kind.label());
        log::debug!(
            "detected table {:?}: {} columns, {} rows",
            entry.title,
            entry.column_count(),
            entry.row_count()
        );

        if !entry.rows.is_empty() {
            extract_table_metrics(
                &entry,
                doc,
                &self.options.keywords,
                self.options.min_magnitude,
            );
        }
        doc.add_table(entry);
    }

    /// Re-scan the aggregate markup for tables the upstream did not emit as
    /// individual chunks, deduplicating against chunk-derived tables.
    fn full_markup_pass(&self, response: &ParseResponse, doc: &mut DocumentData) {
        let markdown = match &response.markdown {
            Some(markdown) if contains_table_tag(markdown) => markdown,
            _ => return,
        };

        let table_sel = Selector::parse("table").unwrap();
        let document = Html::parse_document(markdown);
        for (idx, element) in document.select(&table_sel).enumerate() {
            let table_html = element.html();
            let table_text = element.text().collect::<Vec<_>>().join(" ");

            let (header, rows) = reconstruct(&table_html, &normalize(&table_html));
            if header.is_empty() && rows.is_empty() {
                continue;
            }
            if doc.has_table_content(&header, &rows) {
                log::debug!("aggregate-markup table {idx} duplicates a chunk table");
                continue;
            }
            let table_id = format!("full-markdown-table-{idx}");
            if doc.tables.iter().any(|t| t.id == table_id) {
                continue;
            }

            let entry = TableEntry::new(table_id, infer_title(&table_text))
                .with_content(header, rows)
                .with_source_type("markdown_table");
            if !entry.rows.is_empty() {
                extract_table_metrics(
                    &entry,
                    doc,
                    &self.options.keywords,
                    self.options.min_magnitude,
                );
            }
            doc.add_table(entry);
        }
    }

    /// Direct keyword extraction over the raw text, run only when the
    /// table passes produced no income-statement or balance-sheet data;
    /// the fee-amount probe runs unconditionally.
    fn fallback_pass(&self, full_text: &str, doc: &mut DocumentData) {
        let policy = &self.options.keywords;
        let min = self.options.min_magnitude;

        if doc.statements_empty() {
            if let Some(value) = find_keyword_metric(full_text, &policy.revenue_keywords, min) {
                doc.add_metric(Metric::new("Revenue", value));
                doc.set_income_statement("revenue", value);
            }
            if let Some(value) = find_keyword_metric(full_text, &policy.net_income_keywords, min) {
                doc.add_metric(Metric::new("Net Income", value));
                doc.set_income_statement("net_income", value);
            }
            if let Some(value) = find_keyword_metric(full_text, &policy.total_assets_keywords, min)
            {
                doc.add_metric(Metric::new("Total Assets", value));
                doc.set_balance_sheet("total_assets", value);
            }
            if let Some(value) =
                find_keyword_metric(full_text, &policy.operating_cash_keywords, min)
            {
                doc.add_metric(Metric::new("Operating Cash Flow", value));
                doc.set_cash_flow("operating_cash_flow", value);
            }
        }

        if let Some(value) = find_keyword_metric(full_text, &policy.fee_keywords, min) {
            doc.add_metric(Metric::new("Fee Amount", value));
        }
    }

    /// Infer the document type from full text, only if still unresolved;
    /// ordered checks, first match wins.
    fn infer_document_type(&self, full_text: &str, doc: &mut DocumentData) {
        if doc.metadata.type_resolved() {
            return;
        }
        let lower = full_text.to_lowercase();

        let inferred = if lower.contains("invoice") {
            "Invoice"
        } else if lower.contains("fee") || lower.contains("payment") {
            "Fee Document"
        } else if lower.contains("statement") && lower.contains("financial") {
            "Financial Statement"
        } else if lower.contains("balance sheet") {
            "Balance Sheet"
        } else if lower.contains("income statement") || lower.contains("profit and loss") {
            "Income Statement"
        } else if lower.contains("cash flow") {
            "Cash Flow Statement"
        } else if lower.contains("receipt") {
            "Receipt"
        } else if lower.contains("report") {
            "Financial Report"
        } else {
            return;
        };
        doc.metadata.resolve_type(inferred);
    }
}

fn snapshots(response: &ParseResponse) -> Vec<ChunkSnapshot> {
    response
        .chunks
        .iter()
        .map(|chunk| ChunkSnapshot {
            id: chunk.id.clone(),
            kind: chunk.kind.label().to_string(),
            text: chunk.normalized_text(),
            raw_markup: chunk.raw_markup.clone(),
            page: chunk.page(),
            bounds: chunk.bounds(),
        })
        .collect()
}
