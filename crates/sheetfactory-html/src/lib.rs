//! # sheetfactory-html
//!
//! Renders sheetfactory workbooks as standalone HTML documents, one
//! `<table>` per worksheet.

mod error;
mod options;
mod writer;

pub use error::{HtmlError, HtmlResult};
pub use options::HtmlWriteOptions;
pub use writer::HtmlWriter;
