//! Error types for the finsift library.

use thiserror::Error;

/// Result type alias for finsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while mapping a parse response.
#[derive(Error, Debug)]
pub enum Error {
    /// The upstream parse response could not be decoded.
    #[error("Response decode error: {0}")]
    Decode(String),

    /// Error reconstructing a table from chunk markup.
    #[error("Table reconstruction error: {0}")]
    TableParse(String),

    /// Error during rendering (summary, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
