//! HTML writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::escape::escape;

use crate::error::{HtmlError, HtmlResult};
use crate::options::HtmlWriteOptions;
use sheetfactory_core::{CellValue, Workbook, Worksheet};

const STYLE_BLOCK: &str = "\
html { font-family: Calibri, Arial, Helvetica, sans-serif; font-size: 11pt }
table { border-collapse: collapse; page-break-after: always }
td { border: 1px dotted black; padding: 1px 4px; vertical-align: bottom }
td.n { text-align: right }
td.b { text-align: center }
td.e { text-align: center; color: #c00000 }
ul.navigation { list-style: none; padding: 0 }
ul.navigation li { display: inline; margin-right: 1em }
";

const INLINE_TABLE: &str = "border-collapse:collapse";
const INLINE_CELL: &str = "border:1px dotted black;padding:1px 4px;vertical-align:bottom";

/// HTML writer rendering worksheets as tables
#[derive(Debug, Clone, Default)]
pub struct HtmlWriter {
    options: HtmlWriteOptions,
}

impl HtmlWriter {
    /// Create a writer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given options
    pub fn with_options(options: HtmlWriteOptions) -> Self {
        Self { options }
    }

    /// Current options
    pub fn options(&self) -> &HtmlWriteOptions {
        &self.options
    }

    /// Render only the sheet at `index`
    pub fn set_sheet_index(&mut self, index: usize) -> &mut Self {
        self.options.sheet_index = Some(index);
        self
    }

    /// Render every sheet of the workbook
    pub fn write_all_sheets(&mut self) -> &mut Self {
        self.options.sheet_index = None;
        self
    }

    pub fn set_use_inline_css(&mut self, inline: bool) -> &mut Self {
        self.options.use_inline_css = inline;
        self
    }

    pub fn set_generate_sheet_navigation_block(&mut self, generate: bool) -> &mut Self {
        self.options.generate_sheet_navigation_block = generate;
        self
    }

    pub fn set_pre_calculate_formulas(&mut self, pre_calculate: bool) -> &mut Self {
        self.options.pre_calculate_formulas = pre_calculate;
        self
    }

    /// Write the document to a file
    pub fn write_file<P: AsRef<Path>>(&self, workbook: &Workbook, path: P) -> HtmlResult<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write(workbook, &mut file)?;
        file.flush()?;
        Ok(())
    }

    /// Write the document to any sink
    pub fn write<W: Write>(&self, workbook: &Workbook, mut sink: W) -> HtmlResult<()> {
        let sheets = self.selected_sheets(workbook)?;
        log::debug!("rendering {} sheet(s) as HTML", sheets.len());

        let title = workbook
            .properties()
            .title
            .as_deref()
            .unwrap_or("Untitled Spreadsheet");

        writeln!(sink, "<!DOCTYPE html>")?;
        writeln!(sink, "<html>")?;
        writeln!(sink, "<head>")?;
        writeln!(sink, "<meta charset=\"utf-8\">")?;
        writeln!(sink, "<title>{}</title>", escape(title))?;
        if !self.options.use_inline_css {
            write!(sink, "<style>\n{STYLE_BLOCK}</style>\n")?;
        }
        writeln!(sink, "</head>")?;
        writeln!(sink, "<body>")?;

        if self.options.sheet_index.is_none()
            && self.options.generate_sheet_navigation_block
            && sheets.len() > 1
        {
            writeln!(sink, "<ul class=\"navigation\">")?;
            for (index, sheet) in &sheets {
                writeln!(
                    sink,
                    "<li class=\"sheet{index}\"><a href=\"#sheet{index}\">{}</a></li>",
                    escape(sheet.name())
                )?;
            }
            writeln!(sink, "</ul>")?;
        }

        for (index, sheet) in &sheets {
            self.write_table(*index, sheet, &mut sink)?;
        }

        writeln!(sink, "</body>")?;
        writeln!(sink, "</html>")?;
        sink.flush()?;
        Ok(())
    }

    fn selected_sheets<'a>(&self, workbook: &'a Workbook) -> HtmlResult<Vec<(usize, &'a Worksheet)>> {
        match self.options.sheet_index {
            Some(index) => {
                let sheet = workbook
                    .worksheet(index)
                    .ok_or(HtmlError::SheetOutOfBounds {
                        index,
                        count: workbook.sheet_count(),
                    })?;
                Ok(vec![(index, sheet)])
            }
            None => Ok(workbook.worksheets().enumerate().collect()),
        }
    }

    fn write_table<W: Write>(&self, index: usize, sheet: &Worksheet, sink: &mut W) -> HtmlResult<()> {
        if self.options.use_inline_css {
            writeln!(
                sink,
                "<table id=\"sheet{index}\" class=\"sheet{index}\" style=\"{INLINE_TABLE}\">"
            )?;
        } else {
            writeln!(sink, "<table id=\"sheet{index}\" class=\"sheet{index}\">")?;
        }

        for (row_idx, row) in sheet.rows().enumerate() {
            write!(sink, "<tr class=\"row{row_idx}\">")?;
            for value in &row {
                self.write_cell(value, sink)?;
            }
            writeln!(sink, "</tr>")?;
        }

        writeln!(sink, "</table>")?;
        Ok(())
    }

    fn write_cell<W: Write>(&self, value: &CellValue, sink: &mut W) -> HtmlResult<()> {
        let calculated = self.options.pre_calculate_formulas;
        let kind = if calculated || !value.is_formula() {
            cell_class(value.effective_value())
        } else {
            "s"
        };
        let text = value.to_text(calculated);

        if self.options.use_inline_css {
            write!(
                sink,
                "<td style=\"{INLINE_CELL};{}\">{}</td>",
                inline_alignment(kind),
                escape(text.as_str())
            )?;
        } else {
            write!(sink, "<td class=\"{kind}\">{}</td>", escape(text.as_str()))?;
        }
        Ok(())
    }
}

/// Style class keyed by the rendered value kind
fn cell_class(value: &CellValue) -> &'static str {
    match value {
        CellValue::Number(_) => "n",
        CellValue::Boolean(_) => "b",
        CellValue::Error(_) => "e",
        _ => "s",
    }
}

fn inline_alignment(kind: &str) -> &'static str {
    match kind {
        "n" => "text-align:right",
        "b" => "text-align:center",
        "e" => "text-align:center;color:#c00000",
        _ => "text-align:left",
    }
}
