//! The in-memory document

use crate::error::{Error, Result};
use crate::properties::DocumentProperties;
use crate::worksheet::Worksheet;
use crate::{DEFAULT_SHEET_NAME, MAX_SHEET_NAME_LEN};

/// An ordered set of uniquely named worksheets plus document properties
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    active_sheet: usize,
    properties: DocumentProperties,
}

impl Workbook {
    /// Create a new workbook with a single empty worksheet
    pub fn new() -> Self {
        let mut wb = Self::empty();
        wb.worksheets.push(Worksheet::new(DEFAULT_SHEET_NAME));
        wb
    }

    /// Create a workbook with no worksheets, for readers to fill in
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            active_sheet: 0,
            properties: DocumentProperties::default(),
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Position of the sheet called `name` (exact match)
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Names of all worksheets, in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new, empty worksheet
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_existing_worksheet(Worksheet::new(name))
    }

    /// Append a populated worksheet
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name(), None)?;
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(new_name, Some(index))?;
        self.worksheets[index].set_name(new_name);
        Ok(())
    }

    /// Sheet shown first when the document is opened
    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.active_sheet = index;
        Ok(())
    }

    /// Document properties
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Mutable document properties
    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    fn validate_sheet_name(&self, name: &str, skip: Option<usize>) -> Result<()> {
        if name.is_empty() || name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "'{name}' must be 1 to {MAX_SHEET_NAME_LEN} characters"
            )));
        }
        if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
            return Err(Error::InvalidSheetName(format!(
                "'{name}' contains invalid character '{c}'"
            )));
        }
        let duplicate = self
            .worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != skip && ws.name().eq_ignore_ascii_case(name));
        if duplicate {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}
