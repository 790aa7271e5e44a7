//! XLSX writer backed by rust_xlsxwriter.

use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{DocProperties, Formula, Workbook as XlsxWorkbook, Worksheet as XlsxSheet};

use crate::error::XlsxResult;
use sheetfactory_core::{CellValue, DocumentProperties, Workbook, Worksheet};

/// XLSX writer
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    pre_calculate_formulas: bool,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            pre_calculate_formulas: true,
        }
    }
}

impl XlsxWriter {
    /// Create a writer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cached formula results are stored next to the formula text
    pub fn pre_calculate_formulas(&self) -> bool {
        self.pre_calculate_formulas
    }

    pub fn set_pre_calculate_formulas(&mut self, pre_calculate: bool) -> &mut Self {
        self.pre_calculate_formulas = pre_calculate;
        self
    }

    /// Write the workbook to a file path
    pub fn write_file<P: AsRef<Path>>(&self, workbook: &Workbook, path: P) -> XlsxResult<()> {
        let mut xlsx = self.build(workbook)?;
        xlsx.save(path.as_ref())?;
        Ok(())
    }

    /// Serialize the workbook into memory
    pub fn write_to_buffer(&self, workbook: &Workbook) -> XlsxResult<Vec<u8>> {
        let mut xlsx = self.build(workbook)?;
        Ok(xlsx.save_to_buffer()?)
    }

    /// Write the workbook to any sink.
    ///
    /// The package is assembled in memory first, so the sink needs no `Seek`.
    pub fn write<W: Write>(&self, workbook: &Workbook, mut sink: W) -> XlsxResult<()> {
        let bytes = self.write_to_buffer(workbook)?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }

    fn build(&self, workbook: &Workbook) -> XlsxResult<XlsxWorkbook> {
        let mut xlsx = XlsxWorkbook::new();

        if !workbook.properties().is_empty() {
            xlsx.set_properties(&doc_properties(workbook.properties()));
        }

        for sheet in workbook.worksheets() {
            let target = xlsx.add_worksheet();
            target.set_name(sheet.name())?;
            self.write_cells(sheet, target)?;
        }

        if let Ok(active) = xlsx.worksheet_from_index(workbook.active_sheet()) {
            active.set_active(true);
        }

        Ok(xlsx)
    }

    fn write_cells(&self, sheet: &Worksheet, target: &mut XlsxSheet) -> XlsxResult<()> {
        for (row, col, value) in sheet.iter_cells() {
            match value {
                CellValue::Empty => {}
                CellValue::Boolean(b) => {
                    target.write_boolean(row, col, *b)?;
                }
                CellValue::Number(n) => {
                    target.write_number(row, col, *n)?;
                }
                CellValue::String(s) => {
                    target.write_string(row, col, s)?;
                }
                CellValue::Error(e) => {
                    // an error literal formula keeps the cell an error when read back
                    let formula = Formula::new(e.as_str()).set_result(e.as_str());
                    target.write_formula(row, col, formula)?;
                }
                CellValue::Formula { text, .. } => {
                    let mut formula = Formula::new(text);
                    if self.pre_calculate_formulas {
                        let cached = value.effective_value();
                        if !cached.is_empty() {
                            formula = formula.set_result(cached.to_string());
                        }
                    }
                    target.write_formula(row, col, formula)?;
                }
            }
        }
        Ok(())
    }
}

fn doc_properties(props: &DocumentProperties) -> DocProperties {
    let mut doc = DocProperties::new();
    if let Some(title) = &props.title {
        doc = doc.set_title(title);
    }
    if let Some(subject) = &props.subject {
        doc = doc.set_subject(subject);
    }
    if let Some(creator) = &props.creator {
        doc = doc.set_author(creator);
    }
    if let Some(keywords) = &props.keywords {
        doc = doc.set_keywords(keywords);
    }
    if let Some(description) = &props.description {
        doc = doc.set_comment(description);
    }
    if let Some(company) = &props.company {
        doc = doc.set_company(company);
    }
    doc
}
