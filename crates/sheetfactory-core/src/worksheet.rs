//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellRange, CellValue};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A single sheet: a sparse grid of cell values keyed by `(row, col)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl Worksheet {
    /// Create a new, empty worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name.
    ///
    /// No validation happens here; use [`crate::Workbook::rename_worksheet`]
    /// for sheets that already belong to a workbook.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g. "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellValue>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_at(addr.row, addr.col))
    }

    /// Get a cell by indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Get a cell value by address, `Empty` when unset
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        Ok(self.cell(address)?.cloned().unwrap_or_default())
    }

    /// Get a cell value by indices, `Empty` when unset
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cell_at(row, col).cloned().unwrap_or_default()
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by indices. Setting `Empty` removes the cell.
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS - 1));
        }

        match value.into() {
            CellValue::Empty => {
                self.cells.remove(&(row, col));
            }
            value => {
                self.cells.insert((row, col), value);
            }
        }
        Ok(())
    }

    /// Set a formula (with or without leading `=`) by address string
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        self.set_cell_value(address, CellValue::formula(formula))
    }

    // === Inspection ===

    /// Bounding box of all populated cells, `None` for an empty sheet
    pub fn used_range(&self) -> Option<CellRange> {
        let mut cells = self.cells.keys();
        let &(first_row, first_col) = cells.next()?;
        let (mut min_col, mut max_col) = (first_col, first_col);
        let mut max_row = first_row;
        for &(row, col) in cells {
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
        }
        Some(CellRange::from_indices(first_row, min_col, max_row, max_col))
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check whether the sheet holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate populated cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.cells.iter().map(|(&(row, col), value)| (row, col, value))
    }

    /// Rows from `A1` down to the bottom-right populated cell, built one at
    /// a time.
    ///
    /// Every row is as wide as the rightmost populated column; gaps are
    /// [`CellValue::Empty`]. An empty sheet yields no rows.
    pub fn rows(&self) -> impl Iterator<Item = Vec<CellValue>> + '_ {
        let (height, width) = match self.used_range() {
            Some(range) => (range.end.row + 1, range.end.col as usize + 1),
            None => (0, 0),
        };
        (0..height).map(move |row| self.row_values(row, width))
    }

    fn row_values(&self, row: u32, width: usize) -> Vec<CellValue> {
        let mut values = vec![CellValue::Empty; width];
        for (&(_, col), value) in self.cells.range((row, 0)..=(row, MAX_COLS - 1)) {
            values[col as usize] = value.clone();
        }
        values
    }
}
