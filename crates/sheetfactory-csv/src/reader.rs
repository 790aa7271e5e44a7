//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sheetfactory_core::{CellValue, Workbook, Worksheet, MAX_COLS};

/// Delimiters tried, in order of preference, when none is configured
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of lines sampled for delimiter inference
const INFERENCE_LINES: usize = 10;

/// CSV reader producing a single-sheet workbook
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    options: CsvReadOptions,
}

impl CsvReader {
    /// Create a reader with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with the given options
    pub fn with_options(options: CsvReadOptions) -> Self {
        Self { options }
    }

    /// Current options
    pub fn options(&self) -> &CsvReadOptions {
        &self.options
    }

    /// Fix the delimiter instead of inferring it
    pub fn set_delimiter(&mut self, delimiter: Option<u8>) -> &mut Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn set_enclosure(&mut self, enclosure: u8) -> &mut Self {
        self.options.enclosure = enclosure;
        self
    }

    pub fn set_sheet_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.options.sheet_name = name.into();
        self
    }

    /// Whether a byte sample looks like delimited text
    pub fn can_read(sample: &[u8]) -> bool {
        !sample.contains(&0) && std::str::from_utf8(trim_partial_char(sample)).is_ok()
    }

    /// Read a CSV file into a workbook
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> CsvResult<Workbook> {
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read CSV from any source into a workbook
    pub fn read<R: Read>(&self, reader: R) -> CsvResult<Workbook> {
        let mut workbook = Workbook::empty();
        workbook.add_existing_worksheet(self.read_sheet(reader)?)?;
        Ok(workbook)
    }

    /// Read CSV from any source into a single worksheet
    pub fn read_sheet<R: Read>(&self, mut reader: R) -> CsvResult<Worksheet> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes)?;
        let mut text = content.strip_prefix('\u{feff}').unwrap_or(content.as_str());

        let mut delimiter = self.options.delimiter;
        let (first, rest) = split_first_line(text);
        if let Some([byte]) = first.strip_prefix("sep=").map(str::as_bytes) {
            delimiter = delimiter.or(Some(*byte));
            text = rest;
        }
        let delimiter = delimiter.unwrap_or_else(|| infer_delimiter(text));
        log::debug!("reading CSV with delimiter {:?}", delimiter as char);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.options.enclosure)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut worksheet = Worksheet::new(self.options.sheet_name.clone());
        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            for (col, field) in record.iter().enumerate().take(MAX_COLS as usize) {
                let value = if self.options.auto_detect_types {
                    detect_type(field)
                } else {
                    CellValue::string(field)
                };
                worksheet.set_cell_value_at(row_idx as u32, col as u16, value)?;
            }
        }

        Ok(worksheet)
    }
}

/// First line without its terminator, and everything after it
fn split_first_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(end) => (text[..end].trim_end_matches('\r'), &text[end + 1..]),
        None => (text.trim_end_matches('\r'), ""),
    }
}

/// Pick the candidate that appears on every sampled line most often.
fn infer_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(INFERENCE_LINES)
        .collect();

    let mut best = (b',', 0usize);
    for candidate in CANDIDATE_DELIMITERS {
        let min_count = lines
            .iter()
            .map(|line| line.bytes().filter(|b| *b == candidate).count())
            .min()
            .unwrap_or(0);
        if min_count > best.1 {
            best = (candidate, min_count);
        }
    }
    best.0
}

/// Typed value for a raw field: numbers, booleans and `=` formulas.
fn detect_type(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if field.len() > 1 && field.starts_with('=') {
        return CellValue::formula(field);
    }
    if field.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    if looks_numeric(field) {
        if let Ok(n) = field.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
    }
    CellValue::string(field)
}

/// Plain decimal notation only; leading zeros (`007`) stay text.
fn looks_numeric(field: &str) -> bool {
    let unsigned = field.strip_prefix(['-', '+']).unwrap_or(field);
    let bytes = unsigned.as_bytes();
    let leading_zero = bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit();
    bytes.first().is_some_and(|b| b.is_ascii_digit() || *b == b'.')
        && !leading_zero
        && bytes
            .iter()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'-' | b'+'))
}

/// Drop a multi-byte character cut off at the end of a sample.
fn trim_partial_char(sample: &[u8]) -> &[u8] {
    match std::str::from_utf8(sample) {
        Ok(_) => sample,
        Err(e) if e.error_len().is_none() => &sample[..e.valid_up_to()],
        Err(_) => sample,
    }
}
