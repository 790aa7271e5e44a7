//! # sheetfactory-csv
//!
//! CSV reader and writer for sheetfactory workbooks.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineEnding};
pub use reader::CsvReader;
pub use writer::CsvWriter;
