//! # sheetfactory-xlsx
//!
//! Excel-family support for sheetfactory workbooks.
//!
//! Reading covers XLSX, XLS, XLSB and ODS through `calamine`; writing
//! produces XLSX through `rust_xlsxwriter`. Both sides map to and from
//! [`sheetfactory_core::Workbook`].

pub mod error;
pub mod reader;
pub mod writer;

mod signature;

pub use error::{ExcelError, ExcelResult, XlsxError, XlsxResult};
pub use reader::{ExcelFormat, ExcelReader};
pub use writer::XlsxWriter;
