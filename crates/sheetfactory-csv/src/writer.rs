//! CSV writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::{CsvWriteOptions, LineEnding};
use sheetfactory_core::Workbook;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV writer for a single sheet of a workbook
#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    options: CsvWriteOptions,
}

impl CsvWriter {
    /// Create a writer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given options
    pub fn with_options(options: CsvWriteOptions) -> Self {
        Self { options }
    }

    /// Current options
    pub fn options(&self) -> &CsvWriteOptions {
        &self.options
    }

    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn set_enclosure(&mut self, enclosure: u8) -> &mut Self {
        self.options.enclosure = enclosure;
        self
    }

    pub fn set_enclosure_required(&mut self, required: bool) -> &mut Self {
        self.options.enclosure_required = required;
        self
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) -> &mut Self {
        self.options.line_ending = line_ending;
        self
    }

    pub fn set_sheet_index(&mut self, index: usize) -> &mut Self {
        self.options.sheet_index = index;
        self
    }

    pub fn set_use_bom(&mut self, use_bom: bool) -> &mut Self {
        self.options.use_bom = use_bom;
        self
    }

    pub fn set_include_separator_line(&mut self, include: bool) -> &mut Self {
        self.options.include_separator_line = include;
        self
    }

    pub fn set_pre_calculate_formulas(&mut self, pre_calculate: bool) -> &mut Self {
        self.options.pre_calculate_formulas = pre_calculate;
        self
    }

    /// Switch to [`CsvWriteOptions::excel_compatible`], keeping the sheet
    /// index and formula handling. Turning it off restores the defaults.
    pub fn set_excel_compatibility(&mut self, enabled: bool) -> &mut Self {
        let base = if enabled {
            CsvWriteOptions::excel_compatible()
        } else {
            CsvWriteOptions::default()
        };
        self.options = CsvWriteOptions {
            sheet_index: self.options.sheet_index,
            pre_calculate_formulas: self.options.pre_calculate_formulas,
            ..base
        };
        self
    }

    /// Write the selected sheet to a file
    pub fn write_file<P: AsRef<Path>>(&self, workbook: &Workbook, path: P) -> CsvResult<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write(workbook, &mut file)?;
        file.flush()?;
        Ok(())
    }

    /// Write the selected sheet to any sink
    pub fn write<W: Write>(&self, workbook: &Workbook, mut sink: W) -> CsvResult<()> {
        let options = &self.options;
        let sheet =
            workbook
                .worksheet(options.sheet_index)
                .ok_or(CsvError::SheetOutOfBounds {
                    index: options.sheet_index,
                    count: workbook.sheet_count(),
                })?;

        if options.use_bom {
            sink.write_all(UTF8_BOM)?;
        }
        if options.include_separator_line {
            write!(
                sink,
                "sep={}{}",
                options.delimiter as char,
                options.line_ending.as_str()
            )?;
        }

        let terminator = match options.line_ending {
            LineEnding::LF => csv::Terminator::Any(b'\n'),
            LineEnding::CRLF => csv::Terminator::CRLF,
            LineEnding::CR => csv::Terminator::Any(b'\r'),
        };
        let quote_style = if options.enclosure_required {
            csv::QuoteStyle::Always
        } else {
            csv::QuoteStyle::Necessary
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.enclosure)
            .quote_style(quote_style)
            .terminator(terminator)
            .flexible(true)
            .from_writer(&mut sink);

        for row in sheet.rows() {
            csv_writer.write_record(
                row.iter()
                    .map(|value| value.to_text(options.pre_calculate_formulas)),
            )?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetfactory_core::CellValue;

    fn sample() -> Workbook {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "name").unwrap();
        sheet.set_cell_value("B1", "note").unwrap();
        sheet.set_cell_value("A2", "Ann").unwrap();
        sheet.set_cell_value("B2", "likes; commas, too").unwrap();
        sheet
            .set_cell_value("C2", CellValue::formula_with_result("1+1", CellValue::Number(2.0)))
            .unwrap();
        wb
    }

    fn render(writer: &CsvWriter, wb: &Workbook) -> String {
        let mut out = Vec::new();
        writer.write(wb, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_output() {
        let out = render(&CsvWriter::new(), &sample());
        assert_eq!(out, "name,note,\nAnn,\"likes; commas, too\",2\n");
    }

    #[test]
    fn test_delimiter_and_formula_text() {
        let mut writer = CsvWriter::new();
        writer.set_delimiter(b';').set_pre_calculate_formulas(false);
        let out = render(&writer, &sample());
        assert_eq!(out, "name;note;\nAnn;\"likes; commas, too\";=1+1\n");
    }

    #[test]
    fn test_excel_compatibility() {
        let mut writer = CsvWriter::new();
        writer.set_excel_compatibility(true);
        let out = render(&writer, &sample());
        assert!(out.starts_with("\u{feff}sep=;\r\n\"name\";\"note\";\"\"\r\n"));
    }

    #[test]
    fn test_sheet_index_out_of_bounds() {
        let mut writer = CsvWriter::new();
        writer.set_sheet_index(3);
        let err = writer.write(&sample(), Vec::new()).unwrap_err();
        assert!(matches!(err, CsvError::SheetOutOfBounds { index: 3, count: 1 }));
    }

    #[test]
    fn test_empty_sheet_writes_nothing() {
        assert_eq!(render(&CsvWriter::new(), &Workbook::new()), "");
    }
}
