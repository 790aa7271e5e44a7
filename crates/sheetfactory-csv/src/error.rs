//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input is not valid UTF-8
    #[error("CSV input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The requested sheet does not exist
    #[error("Sheet index {index} out of bounds (count: {count})")]
    SheetOutOfBounds { index: usize, count: usize },

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetfactory_core::Error),
}
