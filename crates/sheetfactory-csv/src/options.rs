//! CSV options

use sheetfactory_core::DEFAULT_SHEET_NAME;

/// Options for reading CSV files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter; `None` infers it from the first lines
    pub delimiter: Option<u8>,
    /// Quote character (default: double quote)
    pub enclosure: u8,
    /// Name of the sheet the rows are loaded into
    pub sheet_name: String,
    /// Turn numeric, boolean and `=formula` fields into typed values
    pub auto_detect_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            enclosure: b'"',
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            auto_detect_types: true,
        }
    }
}

/// Options for writing CSV files
#[derive(Debug, Clone, PartialEq)]
pub struct CsvWriteOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub enclosure: u8,
    /// Quote every field instead of only those that need it
    pub enclosure_required: bool,
    /// Line terminator
    pub line_ending: LineEnding,
    /// Index of the sheet to write
    pub sheet_index: usize,
    /// Prefix the output with a UTF-8 byte order mark
    pub use_bom: bool,
    /// Start the output with a `sep=<delimiter>` hint line
    pub include_separator_line: bool,
    /// Write formula results rather than formula text
    pub pre_calculate_formulas: bool,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            enclosure: b'"',
            enclosure_required: false,
            line_ending: LineEnding::LF,
            sheet_index: 0,
            use_bom: false,
            include_separator_line: false,
            pre_calculate_formulas: true,
        }
    }
}

impl CsvWriteOptions {
    /// Settings spreadsheet applications open without an import dialog:
    /// BOM, separator line, semicolons, every field quoted, CRLF.
    pub fn excel_compatible() -> Self {
        Self {
            delimiter: b';',
            enclosure: b'"',
            enclosure_required: true,
            line_ending: LineEnding::CRLF,
            use_bom: true,
            include_separator_line: true,
            ..Self::default()
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
    /// Mac classic (CR)
    CR,
}

impl LineEnding {
    /// Parse the literal terminator sequence (`"\n"`, `"\r\n"`, `"\r"`)
    pub fn from_sequence(s: &str) -> Option<Self> {
        match s {
            "\n" => Some(LineEnding::LF),
            "\r\n" => Some(LineEnding::CRLF),
            "\r" => Some(LineEnding::CR),
            _ => None,
        }
    }

    /// The terminator bytes
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::LF => "\n",
            LineEnding::CRLF => "\r\n",
            LineEnding::CR => "\r",
        }
    }
}
