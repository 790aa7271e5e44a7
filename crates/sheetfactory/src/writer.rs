//! Writer handles.
//!
//! A [`SpreadsheetWriter`] is bound to one document and one output format
//! when it is created. It can be configured through named options and is
//! consumed by [`SpreadsheetWriter::save`].

use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use sheetfactory_core::Workbook;
use sheetfactory_csv::{CsvWriter, LineEnding};
use sheetfactory_html::HtmlWriter;
use sheetfactory_xlsx::XlsxWriter;

use crate::error::{OptionError, WriteError};
use crate::options::{find_option, OptionArgs, OptionDef};

/// A writer bound to a document and an output format
pub trait SpreadsheetWriter: Send {
    /// Canonical output format name
    fn format(&self) -> &str;

    /// The document this writer serializes
    fn document(&self) -> &Arc<Workbook>;

    /// `Content-Type` of the produced output
    fn content_type(&self) -> &'static str;

    /// Usual file extension, without the dot
    fn file_extension(&self) -> &'static str;

    /// Names of the operations accepted by [`Self::set_option`]
    fn option_names(&self) -> Vec<&'static str>;

    /// Run the named operation.
    ///
    /// Returns `Ok(false)` when the writer has no such operation.
    fn set_option(&mut self, operation: &str, args: &[Value]) -> Result<bool, OptionError>;

    /// Serialize the document into `sink`
    fn save(self: Box<Self>, sink: &mut dyn Write) -> Result<(), WriteError>;

    fn as_any(&self) -> &dyn Any;

    /// Serialize the document into a new file at `path`
    fn save_to_path(self: Box<Self>, path: &Path) -> Result<(), WriteError> {
        let mut file = BufWriter::new(File::create(path)?);
        self.save(&mut file)?;
        file.flush()?;
        Ok(())
    }
}

/// Encoder behind a [`BoundWriter`]
pub trait WriterBackend: Send + Sized + 'static {
    const FORMAT: &'static str;
    const CONTENT_TYPE: &'static str;
    const EXTENSION: &'static str;

    /// Named setters of this encoder
    fn option_table() -> &'static [OptionDef<Self>];

    fn encode(&self, workbook: &Workbook, sink: &mut dyn Write) -> Result<(), WriteError>;
}

/// A [`WriterBackend`] bound to its document
pub struct BoundWriter<B> {
    document: Arc<Workbook>,
    backend: B,
}

impl<B: WriterBackend> BoundWriter<B> {
    pub fn new(document: Arc<Workbook>, backend: B) -> Self {
        Self { document, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: WriterBackend + Default> BoundWriter<B> {
    /// Constructor suitable for a format registry
    pub fn boxed(document: Arc<Workbook>) -> Box<dyn SpreadsheetWriter> {
        Box::new(Self::new(document, B::default()))
    }
}

impl<B: WriterBackend> SpreadsheetWriter for BoundWriter<B> {
    fn format(&self) -> &str {
        B::FORMAT
    }

    fn document(&self) -> &Arc<Workbook> {
        &self.document
    }

    fn content_type(&self) -> &'static str {
        B::CONTENT_TYPE
    }

    fn file_extension(&self) -> &'static str {
        B::EXTENSION
    }

    fn option_names(&self) -> Vec<&'static str> {
        B::option_table().iter().map(|def| def.name).collect()
    }

    fn set_option(&mut self, operation: &str, args: &[Value]) -> Result<bool, OptionError> {
        match find_option(B::option_table(), operation) {
            Some(def) => {
                def.invoke(&mut self.backend, args)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn save(self: Box<Self>, sink: &mut dyn Write) -> Result<(), WriteError> {
        log::debug!("saving workbook as {}", B::FORMAT);
        self.backend.encode(&self.document, sink)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// CSV

fn csv_delimiter(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_delimiter(args.ascii_char(0)?);
    Ok(())
}

fn csv_enclosure(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_enclosure(args.ascii_char(0)?);
    Ok(())
}

fn csv_enclosure_required(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_enclosure_required(args.bool(0)?);
    Ok(())
}

fn csv_line_ending(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    let sequence = args.str(0)?;
    let line_ending = LineEnding::from_sequence(sequence)
        .ok_or_else(|| args.invalid(0, "\"\\n\", \"\\r\\n\" or \"\\r\"", &Value::from(sequence)))?;
    w.set_line_ending(line_ending);
    Ok(())
}

fn csv_sheet_index(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_sheet_index(args.usize(0)?);
    Ok(())
}

fn csv_use_bom(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_use_bom(args.bool(0)?);
    Ok(())
}

fn csv_separator_line(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_include_separator_line(args.bool(0)?);
    Ok(())
}

fn csv_excel_compatibility(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_excel_compatibility(args.bool(0)?);
    Ok(())
}

fn csv_pre_calculate(w: &mut CsvWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_pre_calculate_formulas(args.bool(0)?);
    Ok(())
}

static CSV_OPTIONS: &[OptionDef<CsvWriter>] = &[
    OptionDef {
        name: "set_delimiter",
        min_args: 1,
        implementation: csv_delimiter,
    },
    OptionDef {
        name: "set_enclosure",
        min_args: 1,
        implementation: csv_enclosure,
    },
    OptionDef {
        name: "set_enclosure_required",
        min_args: 1,
        implementation: csv_enclosure_required,
    },
    OptionDef {
        name: "set_line_ending",
        min_args: 1,
        implementation: csv_line_ending,
    },
    OptionDef {
        name: "set_sheet_index",
        min_args: 1,
        implementation: csv_sheet_index,
    },
    OptionDef {
        name: "set_use_bom",
        min_args: 1,
        implementation: csv_use_bom,
    },
    OptionDef {
        name: "set_include_separator_line",
        min_args: 1,
        implementation: csv_separator_line,
    },
    OptionDef {
        name: "set_excel_compatibility",
        min_args: 1,
        implementation: csv_excel_compatibility,
    },
    OptionDef {
        name: "set_pre_calculate_formulas",
        min_args: 1,
        implementation: csv_pre_calculate,
    },
];

impl WriterBackend for CsvWriter {
    const FORMAT: &'static str = "Csv";
    const CONTENT_TYPE: &'static str = "text/csv; charset=UTF-8";
    const EXTENSION: &'static str = "csv";

    fn option_table() -> &'static [OptionDef<Self>] {
        CSV_OPTIONS
    }

    fn encode(&self, workbook: &Workbook, sink: &mut dyn Write) -> Result<(), WriteError> {
        Ok(self.write(workbook, sink)?)
    }
}

// XLSX

fn xlsx_pre_calculate(w: &mut XlsxWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_pre_calculate_formulas(args.bool(0)?);
    Ok(())
}

static XLSX_OPTIONS: &[OptionDef<XlsxWriter>] = &[OptionDef {
    name: "set_pre_calculate_formulas",
    min_args: 1,
    implementation: xlsx_pre_calculate,
}];

impl WriterBackend for XlsxWriter {
    const FORMAT: &'static str = "Xlsx";
    const CONTENT_TYPE: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    const EXTENSION: &'static str = "xlsx";

    fn option_table() -> &'static [OptionDef<Self>] {
        XLSX_OPTIONS
    }

    fn encode(&self, workbook: &Workbook, sink: &mut dyn Write) -> Result<(), WriteError> {
        Ok(self.write(workbook, sink)?)
    }
}

// HTML

fn html_sheet_index(w: &mut HtmlWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_sheet_index(args.usize(0)?);
    Ok(())
}

fn html_all_sheets(w: &mut HtmlWriter, _: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.write_all_sheets();
    Ok(())
}

fn html_inline_css(w: &mut HtmlWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_use_inline_css(args.bool(0)?);
    Ok(())
}

fn html_navigation(w: &mut HtmlWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_generate_sheet_navigation_block(args.bool(0)?);
    Ok(())
}

fn html_pre_calculate(w: &mut HtmlWriter, args: &OptionArgs<'_>) -> Result<(), OptionError> {
    w.set_pre_calculate_formulas(args.bool(0)?);
    Ok(())
}

static HTML_OPTIONS: &[OptionDef<HtmlWriter>] = &[
    OptionDef {
        name: "set_sheet_index",
        min_args: 1,
        implementation: html_sheet_index,
    },
    OptionDef {
        name: "write_all_sheets",
        min_args: 0,
        implementation: html_all_sheets,
    },
    OptionDef {
        name: "set_use_inline_css",
        min_args: 1,
        implementation: html_inline_css,
    },
    OptionDef {
        name: "set_generate_sheet_navigation_block",
        min_args: 1,
        implementation: html_navigation,
    },
    OptionDef {
        name: "set_pre_calculate_formulas",
        min_args: 1,
        implementation: html_pre_calculate,
    },
];

impl WriterBackend for HtmlWriter {
    const FORMAT: &'static str = "Html";
    const CONTENT_TYPE: &'static str = "text/html; charset=UTF-8";
    const EXTENSION: &'static str = "html";

    fn option_table() -> &'static [OptionDef<Self>] {
        HTML_OPTIONS
    }

    fn encode(&self, workbook: &Workbook, sink: &mut dyn Write) -> Result<(), WriteError> {
        Ok(self.write(workbook, sink)?)
    }
}
