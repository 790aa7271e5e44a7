//! # sheetfactory-core
//!
//! In-memory workbook model used by every sheetfactory reader and writer.
//!
//! - [`Workbook`] - an ordered set of worksheets plus document properties
//! - [`Worksheet`] - a sparse grid of [`CellValue`]s
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//!
//! ## Example
//!
//! ```rust
//! use sheetfactory_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Region").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//! sheet.set_cell_value_at(1, 0, CellValue::Boolean(true)).unwrap();
//!
//! assert_eq!(sheet.get_value("B1").unwrap().as_number(), Some(42.0));
//! ```

pub mod cell;
pub mod error;
pub mod properties;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellError, CellRange, CellValue};
pub use error::{Error, Result};
pub use properties::DocumentProperties;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Title given to the sheet of a freshly created workbook
pub const DEFAULT_SHEET_NAME: &str = "Worksheet";
