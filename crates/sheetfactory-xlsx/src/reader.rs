//! Excel-family reader backed by calamine.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{CellErrorType, Data, Ods, Range, Reader, Xls, Xlsb, Xlsx};

use crate::error::{ExcelError, ExcelResult};
use crate::signature;
use sheetfactory_core::{CellError, CellValue, Workbook, Worksheet, MAX_COLS, MAX_ROWS};

/// Container formats understood by [`ExcelReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExcelFormat {
    /// Office Open XML workbook
    Xlsx,
    /// BIFF8 workbook in an OLE2 container
    Xls,
    /// Binary Office Open XML workbook
    Xlsb,
    /// OpenDocument spreadsheet
    Ods,
}

impl ExcelFormat {
    /// All formats, in detection order
    pub const ALL: [ExcelFormat; 4] = [
        ExcelFormat::Xlsx,
        ExcelFormat::Xls,
        ExcelFormat::Xlsb,
        ExcelFormat::Ods,
    ];

    /// Canonical format name
    pub fn name(&self) -> &'static str {
        match self {
            ExcelFormat::Xlsx => "Xlsx",
            ExcelFormat::Xls => "Xls",
            ExcelFormat::Xlsb => "Xlsb",
            ExcelFormat::Ods => "Ods",
        }
    }
}

impl fmt::Display for ExcelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reader for one Excel-family format
#[derive(Debug, Clone)]
pub struct ExcelReader {
    format: ExcelFormat,
    sheets_only: Option<Vec<String>>,
}

impl ExcelReader {
    /// Create a reader for the given format, loading every sheet
    pub fn new(format: ExcelFormat) -> Self {
        Self {
            format,
            sheets_only: None,
        }
    }

    /// The format this reader parses
    pub fn format(&self) -> ExcelFormat {
        self.format
    }

    /// Restrict loading to the named sheets; `None` loads all of them
    pub fn set_load_sheets_only(&mut self, sheets: Option<Vec<String>>) -> &mut Self {
        self.sheets_only = sheets;
        self
    }

    /// Sheets selected by [`Self::set_load_sheets_only`]
    pub fn load_sheets_only(&self) -> Option<&[String]> {
        self.sheets_only.as_deref()
    }

    /// Whether the file carries this reader's container signature
    pub fn can_read_file<P: AsRef<Path>>(&self, path: P) -> bool {
        match File::open(path) {
            Ok(file) => self.can_read(BufReader::new(file)),
            Err(_) => false,
        }
    }

    /// Whether the source carries this reader's container signature
    pub fn can_read<RS: Read + Seek>(&self, source: RS) -> bool {
        match self.format {
            ExcelFormat::Xlsx => signature::zip_has_part(source, "xl/workbook.xml"),
            ExcelFormat::Xlsb => signature::zip_has_part(source, "xl/workbook.bin"),
            ExcelFormat::Ods => signature::is_ods(source),
            ExcelFormat::Xls => signature::is_biff_workbook(source),
        }
    }

    /// Load a workbook from a file
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> ExcelResult<Workbook> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Load a workbook from an in-memory buffer
    pub fn read_bytes(&self, bytes: &[u8]) -> ExcelResult<Workbook> {
        self.read(Cursor::new(bytes))
    }

    /// Load a workbook from any seekable source
    pub fn read<RS: Read + Seek>(&self, source: RS) -> ExcelResult<Workbook> {
        match self.format {
            ExcelFormat::Xlsx => self.read_with::<Xlsx<RS>, RS>(source),
            ExcelFormat::Xls => self.read_with::<Xls<RS>, RS>(source),
            ExcelFormat::Xlsb => self.read_with::<Xlsb<RS>, RS>(source),
            ExcelFormat::Ods => self.read_with::<Ods<RS>, RS>(source),
        }
    }

    fn read_with<R, RS>(&self, source: RS) -> ExcelResult<Workbook>
    where
        R: Reader<RS>,
        RS: Read + Seek,
        calamine::Error: From<R::Error>,
    {
        let mut book = R::new(source).map_err(calamine::Error::from)?;
        let mut workbook = Workbook::empty();

        for name in book.sheet_names() {
            if let Some(only) = &self.sheets_only {
                if !only.iter().any(|wanted| wanted == &name) {
                    continue;
                }
            }

            let values = book
                .worksheet_range(&name)
                .map_err(calamine::Error::from)?;
            let formulas = match book.worksheet_formula(&name) {
                Ok(formulas) => Some(formulas),
                Err(e) => {
                    log::debug!("no formulas loaded for sheet '{name}': {e:?}");
                    None
                }
            };

            let sheet = convert_sheet(&name, &values, formulas.as_ref())?;
            workbook.add_existing_worksheet(sheet)?;
        }

        if workbook.is_empty() {
            return Err(ExcelError::NoSheets);
        }
        log::debug!(
            "loaded {} sheet(s) from {} workbook",
            workbook.sheet_count(),
            self.format
        );
        Ok(workbook)
    }
}

fn convert_sheet(
    name: &str,
    values: &Range<Data>,
    formulas: Option<&Range<String>>,
) -> ExcelResult<Worksheet> {
    let mut sheet = Worksheet::new(name);

    if let Some((start_row, start_col)) = values.start() {
        for (row, col, data) in values.used_cells() {
            let (row, col) = (start_row as usize + row, start_col as usize + col);
            if let Some((row, col)) = in_bounds(row, col) {
                sheet.set_cell_value_at(row, col, convert_value(data))?;
            }
        }
    }

    if let Some(formulas) = formulas {
        if let Some((start_row, start_col)) = formulas.start() {
            for (row, col, text) in formulas.used_cells() {
                let (row, col) = (start_row as usize + row, start_col as usize + col);
                let Some((row, col)) = in_bounds(row, col) else {
                    continue;
                };
                if text.is_empty() {
                    continue;
                }
                if let Ok(error) = text.parse::<CellError>() {
                    sheet.set_cell_value_at(row, col, CellValue::Error(error))?;
                    continue;
                }
                let formula = match sheet.get_value_at(row, col) {
                    CellValue::Empty => CellValue::formula(text.as_str()),
                    cached => CellValue::formula_with_result(text.as_str(), cached),
                };
                sheet.set_cell_value_at(row, col, formula)?;
            }
        }
    }

    Ok(sheet)
}

fn in_bounds(row: usize, col: usize) -> Option<(u32, u16)> {
    if row < MAX_ROWS as usize && col < MAX_COLS as usize {
        Some((row as u32, col as u16))
    } else {
        None
    }
}

fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::string(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::string(s.as_str()),
        Data::Error(e) => CellValue::Error(convert_error(e)),
    }
}

fn convert_error(e: &CellErrorType) -> CellError {
    match e {
        CellErrorType::Div0 => CellError::Div0,
        CellErrorType::NA => CellError::Na,
        CellErrorType::Name => CellError::Name,
        CellErrorType::Null => CellError::Null,
        CellErrorType::Num => CellError::Num,
        CellErrorType::Ref => CellError::Ref,
        CellErrorType::Value => CellError::Value,
        CellErrorType::GettingData => CellError::GettingData,
    }
}
