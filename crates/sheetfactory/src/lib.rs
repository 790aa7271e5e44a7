//! # sheetfactory
//!
//! A small factory for spreadsheet documents, meant to live in a web
//! service's shared state.
//!
//! - [`Factory::create_document`] - a new workbook, or one loaded from disk
//!   with its format detected automatically
//! - [`Factory::create_writer`] - a writer bound to a document and an output
//!   format (`Xlsx`, `Csv`, `Html`)
//! - [`Factory::create_reader`] - a reader looked up by format name
//!   (`Xlsx`, `Xls`, `Xlsb`, `Ods`, `Csv`)
//! - [`Factory::create_streamed_response`] - an HTTP response whose body
//!   serializes the document only when it is sent
//!
//! Writers accept named options (`setDelimiter`, `setUseBOM`, ...) through a
//! [`WriterOptions`] map; names a writer does not know are skipped.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sheetfactory::prelude::*;
//!
//! let factory = Factory::new();
//!
//! let mut workbook = factory.create_document(None).unwrap();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("A1", "Region").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//!
//! let options = WriterOptions::new().set("setDelimiter", ";");
//! let response = factory
//!     .create_streamed_response(
//!         Arc::new(workbook),
//!         "Csv",
//!         StatusCode::OK,
//!         HeaderMap::new(),
//!         &options,
//!     )
//!     .unwrap();
//!
//! let mut body = Vec::new();
//! response.send_to(&mut body).unwrap();
//! assert_eq!(body, b"Region;42\n");
//! ```

pub mod detect;
pub mod error;
pub mod factory;
pub mod options;
pub mod prelude;
pub mod reader;
pub mod registry;
pub mod response;
pub mod writer;

pub use error::{
    Error, HandleKind, LoadError, OptionError, Result, UnsupportedFormatError, WriteError,
};
pub use factory::{Factory, FactoryBuilder, FactoryConfig};
pub use options::{apply_writer_options, OptionArgs, OptionDef, WriterOptions};
pub use reader::SpreadsheetReader;
pub use registry::FormatRegistry;
pub use response::{StreamBody, StreamedResponse};
pub use writer::{BoundWriter, SpreadsheetWriter, WriterBackend};

// Re-export the document model and format crates
pub use sheetfactory_core::{
    CellAddress, CellError, CellRange, CellValue, DocumentProperties, Workbook, Worksheet,
};
pub use sheetfactory_csv as csv;
pub use sheetfactory_html as html;
pub use sheetfactory_xlsx as xlsx;

pub use http;
