//! HTML error types

use thiserror::Error;

/// Result type for HTML operations
pub type HtmlResult<T> = std::result::Result<T, HtmlError>;

/// Errors that can occur while rendering HTML
#[derive(Debug, Error)]
pub enum HtmlError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested sheet does not exist
    #[error("Sheet index {index} out of bounds (count: {count})")]
    SheetOutOfBounds { index: usize, count: usize },
}
