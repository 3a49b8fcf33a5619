//! Output data model for mapped documents.
//!
//! This module defines the normalized record that bridges upstream parse
//! responses and downstream consumers (storage, retrieval, report
//! generation). The model is source-agnostic and serializable as a flat
//! mapping.

mod document;
mod metric;
mod table;

pub use document::{
    ChunkSnapshot, DocumentData, DocumentMetadata, UNKNOWN_COMPANY, UNKNOWN_DATE, UNKNOWN_TYPE,
};
pub use metric::{Metric, DEFAULT_PERIOD, DEFAULT_UNIT};
pub use table::{Rect, TableEntry};
