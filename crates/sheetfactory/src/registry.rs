//! Format name to constructor tables

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use sheetfactory_core::Workbook;
use sheetfactory_csv::{CsvReader, CsvWriter};
use sheetfactory_html::HtmlWriter;
use sheetfactory_xlsx::{ExcelFormat, ExcelReader, XlsxWriter};

use crate::reader::SpreadsheetReader;
use crate::writer::{BoundWriter, SpreadsheetWriter};

/// Builds a writer bound to a document
pub type WriterConstructor = Arc<dyn Fn(Arc<Workbook>) -> Box<dyn SpreadsheetWriter> + Send + Sync>;

/// Builds a default-configured reader
pub type ReaderConstructor = Arc<dyn Fn() -> Box<dyn SpreadsheetReader> + Send + Sync>;

/// Built-in formats, created on first use
static BUILTIN: Lazy<Arc<FormatRegistry>> = Lazy::new(|| Arc::new(FormatRegistry::with_builtins()));

/// Registered reader and writer formats, in registration order.
///
/// Names are looked up ignoring ASCII case.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    writers: Vec<(String, WriterConstructor)>,
    readers: Vec<(String, ReaderConstructor)>,
}

impl FormatRegistry {
    /// Create a registry with no formats
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in formats
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_writer("Xlsx", BoundWriter::<XlsxWriter>::boxed);
        registry.register_writer("Csv", BoundWriter::<CsvWriter>::boxed);
        registry.register_writer("Html", BoundWriter::<HtmlWriter>::boxed);

        for format in ExcelFormat::ALL {
            registry.register_reader(format.name(), move || {
                Box::new(ExcelReader::new(format)) as Box<dyn SpreadsheetReader>
            });
        }
        registry.register_reader("Csv", || Box::new(CsvReader::new()) as Box<dyn SpreadsheetReader>);

        registry
    }

    /// The shared built-in registry
    pub fn builtin() -> Arc<FormatRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Register a writer, replacing any format of the same name
    pub fn register_writer<F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        F: Fn(Arc<Workbook>) -> Box<dyn SpreadsheetWriter> + Send + Sync + 'static,
    {
        let constructor: WriterConstructor = Arc::new(constructor);
        upsert(&mut self.writers, name, constructor);
        self
    }

    /// Register a reader, replacing any format of the same name
    pub fn register_reader<F>(&mut self, name: &str, constructor: F) -> &mut Self
    where
        F: Fn() -> Box<dyn SpreadsheetReader> + Send + Sync + 'static,
    {
        let constructor: ReaderConstructor = Arc::new(constructor);
        upsert(&mut self.readers, name, constructor);
        self
    }

    /// Canonical name and constructor of a writer format
    pub fn writer(&self, name: &str) -> Option<(&str, &WriterConstructor)> {
        lookup(&self.writers, name)
    }

    /// Canonical name and constructor of a reader format
    pub fn reader(&self, name: &str) -> Option<(&str, &ReaderConstructor)> {
        lookup(&self.readers, name)
    }

    pub fn writer_names(&self) -> Vec<&str> {
        self.writers.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn reader_names(&self) -> Vec<&str> {
        self.readers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Readers in registration order
    pub(crate) fn readers(&self) -> impl Iterator<Item = (&str, &ReaderConstructor)> {
        self.readers.iter().map(|(name, ctor)| (name.as_str(), ctor))
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("writers", &self.writer_names())
            .field("readers", &self.reader_names())
            .finish()
    }
}

fn upsert<C>(entries: &mut Vec<(String, C)>, name: &str, constructor: C) {
    match entries
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(entry) => *entry = (name.to_string(), constructor),
        None => entries.push((name.to_string(), constructor)),
    }
}

fn lookup<'r, C>(entries: &'r [(String, C)], name: &str) -> Option<(&'r str, &'r C)> {
    entries
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(existing, ctor)| (existing.as_str(), ctor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_names() {
        let registry = FormatRegistry::builtin();
        assert_eq!(registry.writer_names(), vec!["Xlsx", "Csv", "Html"]);
        assert_eq!(registry.reader_names(), vec!["Xlsx", "Xls", "Xlsb", "Ods", "Csv"]);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = FormatRegistry::with_builtins();
        let (name, ctor) = registry.writer("csv").unwrap();
        assert_eq!(name, "Csv");
        assert_eq!(ctor(Arc::new(Workbook::new())).format(), "Csv");
        assert!(registry.writer("Pdf").is_none());
        assert_eq!(registry.reader("XLSB").unwrap().0, "Xlsb");
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = FormatRegistry::with_builtins();
        registry.register_writer("XLSX", BoundWriter::<CsvWriter>::boxed);
        assert_eq!(registry.writer_names(), vec!["XLSX", "Csv", "Html"]);

        let (_, ctor) = registry.writer("xlsx").unwrap();
        assert_eq!(ctor(Arc::new(Workbook::new())).format(), "Csv");
    }
}
