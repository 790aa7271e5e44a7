//! Error types for the factory

use std::fmt;
use std::path::PathBuf;

use sheetfactory_csv::CsvError;
use sheetfactory_html::HtmlError;
use sheetfactory_xlsx::{ExcelError, XlsxError};
use thiserror::Error;

/// Result type for factory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while opening or parsing a source document
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No registered reader accepts the source
    #[error("unable to identify a reader for '{}'", .0.display())]
    Unidentified(PathBuf),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Excel(#[from] ExcelError),
}

/// Which registry a format name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Reader,
    Writer,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Reader => f.write_str("reader"),
            HandleKind::Writer => f.write_str("writer"),
        }
    }
}

/// A format name that is not registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the {kind} [{name}] does not exist or is not supported")]
pub struct UnsupportedFormatError {
    pub kind: HandleKind,
    pub name: String,
}

impl UnsupportedFormatError {
    pub fn reader<S: Into<String>>(name: S) -> Self {
        Self {
            kind: HandleKind::Reader,
            name: name.into(),
        }
    }

    pub fn writer<S: Into<String>>(name: S) -> Self {
        Self {
            kind: HandleKind::Writer,
            name: name.into(),
        }
    }
}

/// Errors raised while applying writer options
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionError {
    /// An argument has the wrong type or value
    #[error("invalid argument {index} for {operation}: expected {expected}, got {found}")]
    InvalidArgument {
        operation: &'static str,
        index: usize,
        expected: &'static str,
        found: String,
    },

    /// Fewer arguments than the operation takes
    #[error("{operation} expects {expected} argument(s), got {actual}")]
    MissingArgument {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The writer has no such operation (strict mode only)
    #[error("the {format} writer has no option named '{name}'")]
    UnknownOperation { format: String, name: String },
}

/// Errors raised while serializing a document
#[derive(Debug, Error)]
pub enum WriteError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    /// Error reported by a custom writer
    #[error("{0}")]
    Other(String),
}

impl WriteError {
    /// Create an error for a custom writer
    pub fn other<S: Into<String>>(msg: S) -> Self {
        WriteError::Other(msg.into())
    }
}

/// Any error the factory can return
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error(transparent)]
    InvalidOption(#[from] OptionError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// Two writer default entries name the same format
    #[error("writer defaults for [{0}] are given more than once")]
    DuplicateDefaults(String),

    /// A response header could not be built
    #[error("invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),
}
