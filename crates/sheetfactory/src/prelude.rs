//! Prelude module - common imports for sheetfactory users
//!
//! ```rust
//! use sheetfactory::prelude::*;
//! ```

pub use crate::{
    CellValue, Factory, FactoryConfig, SpreadsheetReader, SpreadsheetWriter, StreamedResponse,
    Workbook, Worksheet, WriterOptions,
};

pub use http::{HeaderMap, StatusCode};
