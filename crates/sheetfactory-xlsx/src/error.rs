//! Excel error types

use thiserror::Error;

/// Result type for reading Excel-family files
pub type ExcelResult<T> = std::result::Result<T, ExcelError>;

/// Result type for writing XLSX files
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading
#[derive(Debug, Error)]
pub enum ExcelError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the format parser
    #[error(transparent)]
    Calamine(#[from] calamine::Error),

    /// The file holds no (selected) worksheet
    #[error("Workbook contains no worksheets to load")]
    NoSheets,

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetfactory_core::Error),
}

/// Errors that can occur while writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the XLSX encoder
    #[error(transparent)]
    Encoder(#[from] rust_xlsxwriter::XlsxError),
}
