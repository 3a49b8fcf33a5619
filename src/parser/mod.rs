//! Input-side parsing: response decoding, table reconstruction, title and
//! numeric extraction.

mod numeric;
mod response;
mod table;
mod title;

pub use numeric::{extract_number, extract_number_with_threshold, DEFAULT_MIN_MAGNITUDE};
pub use response::{decode_response, stub_response, Chunk, ChunkType, Grounding, ParseResponse};
pub use table::{
    contains_table_tag, has_table_markup, looks_like_table, reconstruct, synthetic_header,
    TableRow,
};
pub use title::infer_title;
