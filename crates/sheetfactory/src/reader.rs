//! Reader handles

use std::any::Any;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use sheetfactory_core::Workbook;
use sheetfactory_csv::CsvReader;
use sheetfactory_xlsx::ExcelReader;

use crate::error::LoadError;

/// Bytes inspected when deciding whether a file is delimited text
const TEXT_SAMPLE_LEN: u64 = 8 * 1024;

/// A reader for one input format
pub trait SpreadsheetReader: Send {
    /// Canonical input format name
    fn format(&self) -> &str;

    /// Whether the file at `path` looks like this reader's format
    fn can_read(&self, path: &Path) -> bool;

    /// Load the whole file into memory
    fn load(&self, path: &Path) -> Result<Workbook, LoadError>;

    /// Load a document held in memory
    fn load_from_bytes(&self, bytes: &[u8]) -> Result<Workbook, LoadError>;

    /// Access the concrete reader to change its settings
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl SpreadsheetReader for CsvReader {
    fn format(&self) -> &str {
        "Csv"
    }

    fn can_read(&self, path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut sample = Vec::new();
        match file.take(TEXT_SAMPLE_LEN).read_to_end(&mut sample) {
            Ok(_) => CsvReader::can_read(&sample),
            Err(_) => false,
        }
    }

    fn load(&self, path: &Path) -> Result<Workbook, LoadError> {
        Ok(self.read_file(path)?)
    }

    fn load_from_bytes(&self, bytes: &[u8]) -> Result<Workbook, LoadError> {
        Ok(self.read(bytes)?)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SpreadsheetReader for ExcelReader {
    fn format(&self) -> &str {
        self.format().name()
    }

    fn can_read(&self, path: &Path) -> bool {
        self.can_read_file(path)
    }

    fn load(&self, path: &Path) -> Result<Workbook, LoadError> {
        Ok(self.read_file(path)?)
    }

    fn load_from_bytes(&self, bytes: &[u8]) -> Result<Workbook, LoadError> {
        Ok(self.read(Cursor::new(bytes))?)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetfactory_xlsx::ExcelFormat;

    #[test]
    fn test_csv_reader_handle() {
        let reader: Box<dyn SpreadsheetReader> = Box::new(CsvReader::new());
        assert_eq!(reader.format(), "Csv");

        let wb = reader.load_from_bytes(b"x;y\n1;2\n").unwrap();
        let sheet = wb.worksheet(0).unwrap();
        assert_eq!(sheet.get_value("B2").unwrap().as_number(), Some(2.0));
    }

    #[test]
    fn test_csv_can_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("data.txt");
        let binary = dir.path().join("data.bin");
        std::fs::write(&text, "a,b\n").unwrap();
        std::fs::write(&binary, [0u8, 1, 2, 3]).unwrap();

        let reader = CsvReader::new();
        assert!(SpreadsheetReader::can_read(&reader, &text));
        assert!(!SpreadsheetReader::can_read(&reader, &binary));
        assert!(!SpreadsheetReader::can_read(&reader, &dir.path().join("missing.csv")));
    }

    #[test]
    fn test_downcast_to_configure() {
        let mut reader: Box<dyn SpreadsheetReader> = Box::new(ExcelReader::new(ExcelFormat::Ods));
        assert_eq!(reader.format(), "Ods");

        let excel = reader.as_any_mut().downcast_mut::<ExcelReader>().unwrap();
        excel.set_load_sheets_only(Some(vec!["Data".to_string()]));
        assert_eq!(excel.load_sheets_only(), Some(&["Data".to_string()][..]));
    }
}
