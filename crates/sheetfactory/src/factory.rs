//! The factory facade

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use http::header::{InvalidHeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use sheetfactory_core::Workbook;

use crate::detect;
use crate::error::{Error, LoadError, OptionError, Result, UnsupportedFormatError};
use crate::options::{self, WriterOptions};
use crate::reader::SpreadsheetReader;
use crate::registry::FormatRegistry;
use crate::response::{StreamBody, StreamedResponse};
use crate::writer::SpreadsheetWriter;

/// Factory settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Reject option names a writer does not know instead of skipping them
    pub strict_options: bool,
    /// Options applied to every new writer of a format, keyed by format name
    pub writer_defaults: BTreeMap<String, WriterOptions>,
}

/// Builder for a [`Factory`] with custom formats or settings
#[derive(Debug)]
pub struct FactoryBuilder {
    registry: FormatRegistry,
    config: FactoryConfig,
}

impl Default for FactoryBuilder {
    fn default() -> Self {
        Self {
            registry: FormatRegistry::with_builtins(),
            config: FactoryConfig::default(),
        }
    }
}

impl FactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an empty registry instead of the built-in formats
    pub fn without_builtins(mut self) -> Self {
        self.registry = FormatRegistry::new();
        self
    }

    pub fn config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strict_options(mut self, strict: bool) -> Self {
        self.config.strict_options = strict;
        self
    }

    /// Options applied to every writer created for `format`
    pub fn writer_defaults(mut self, format: &str, options: WriterOptions) -> Self {
        self.config.writer_defaults.insert(format.to_string(), options);
        self
    }

    pub fn register_writer<F>(mut self, name: &str, constructor: F) -> Self
    where
        F: Fn(Arc<Workbook>) -> Box<dyn SpreadsheetWriter> + Send + Sync + 'static,
    {
        self.registry.register_writer(name, constructor);
        self
    }

    pub fn register_reader<F>(mut self, name: &str, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn SpreadsheetReader> + Send + Sync + 'static,
    {
        self.registry.register_reader(name, constructor);
        self
    }

    /// Build the factory.
    ///
    /// Writer defaults are checked against a scratch writer of each format,
    /// so a bad default fails here rather than on every request.
    ///
    /// Default keys are stored under the canonical format name; two keys
    /// naming the same format fail with [`Error::DuplicateDefaults`].
    pub fn build(self) -> Result<Factory> {
        let FactoryBuilder { registry, mut config } = self;

        let mut canonical = BTreeMap::new();
        for (format, defaults) in std::mem::take(&mut config.writer_defaults) {
            let (name, ctor) = registry
                .writer(&format)
                .ok_or_else(|| UnsupportedFormatError::writer(format.as_str()))?;
            let mut scratch = ctor(Arc::new(Workbook::new()));
            options::apply_writer_options(&mut *scratch, &defaults, config.strict_options)?;

            if canonical.insert(name.to_string(), defaults).is_some() {
                return Err(Error::DuplicateDefaults(name.to_string()));
            }
        }
        config.writer_defaults = canonical;

        Ok(Factory {
            registry: Arc::new(registry),
            config,
        })
    }
}

/// Creates documents, readers, writers and streamed responses.
///
/// Cloning is cheap; the format registry is shared.
#[derive(Debug, Clone)]
pub struct Factory {
    registry: Arc<FormatRegistry>,
    config: FactoryConfig,
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl Factory {
    /// Factory with the built-in formats and default settings
    pub fn new() -> Self {
        Self {
            registry: FormatRegistry::builtin(),
            config: FactoryConfig::default(),
        }
    }

    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    /// Factory with the built-in formats and the given settings
    pub fn with_config(config: FactoryConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// A new empty document, or the document stored at `source`
    pub fn create_document(&self, source: Option<&Path>) -> std::result::Result<Workbook, LoadError> {
        let Some(path) = source else {
            return Ok(Workbook::new());
        };
        let reader = self.create_reader_for_file(path)?;
        let workbook = reader.load(path)?;
        log::debug!(
            "loaded {} as {} ({} sheet(s))",
            path.display(),
            reader.format(),
            workbook.sheet_count()
        );
        Ok(workbook)
    }

    /// A writer for `format_name` bound to `document`
    pub fn create_writer(
        &self,
        document: Arc<Workbook>,
        format_name: &str,
    ) -> std::result::Result<Box<dyn SpreadsheetWriter>, UnsupportedFormatError> {
        let (name, ctor) = self
            .registry
            .writer(format_name)
            .ok_or_else(|| UnsupportedFormatError::writer(format_name))?;
        let mut writer = ctor(document);

        if let Some(defaults) = self.writer_defaults_for(name) {
            // checked by FactoryBuilder::build
            let applied =
                options::apply_writer_options(&mut *writer, defaults, self.config.strict_options);
            if let Err(e) = applied {
                log::warn!("default options for the {} writer were rejected: {}", name, e);
            }
        }
        Ok(writer)
    }

    /// A default-configured reader for `format_name`
    pub fn create_reader(
        &self,
        format_name: &str,
    ) -> std::result::Result<Box<dyn SpreadsheetReader>, UnsupportedFormatError> {
        match self.registry.reader(format_name) {
            Some((_, ctor)) => Ok(ctor()),
            None => Err(UnsupportedFormatError::reader(format_name)),
        }
    }

    /// The reader that accepts the file at `path`
    pub fn create_reader_for_file(
        &self,
        path: &Path,
    ) -> std::result::Result<Box<dyn SpreadsheetReader>, LoadError> {
        let name = self.identify(path)?;
        match self.registry.reader(&name) {
            Some((_, ctor)) => Ok(ctor()),
            None => Err(LoadError::Unidentified(path.to_path_buf())),
        }
    }

    /// Name of the reader format of the file at `path`
    pub fn identify(&self, path: &Path) -> std::result::Result<String, LoadError> {
        detect::identify(&self.registry, path)
    }

    /// Apply named options to a writer
    pub fn apply_writer_options(
        &self,
        writer: &mut dyn SpreadsheetWriter,
        options: &WriterOptions,
    ) -> std::result::Result<(), OptionError> {
        options::apply_writer_options(writer, options, self.config.strict_options)
    }

    /// A response whose body serializes `document` as `format_name`.
    ///
    /// `writer_options` are applied before the response is built; the body
    /// itself runs only when the response is sent.
    pub fn create_streamed_response(
        &self,
        document: Arc<Workbook>,
        format_name: &str,
        status: StatusCode,
        headers: HeaderMap,
        writer_options: &WriterOptions,
    ) -> Result<StreamedResponse> {
        let mut writer = self.create_writer(document, format_name)?;
        if !writer_options.is_empty() {
            self.apply_writer_options(&mut *writer, writer_options)?;
        }
        let body = StreamBody::new(move |sink| writer.save(sink));
        Ok(StreamedResponse::new(body, status, headers))
    }

    /// [`Self::create_streamed_response`] with status 200, no headers and
    /// no writer options
    pub fn stream(&self, document: Arc<Workbook>, format_name: &str) -> Result<StreamedResponse> {
        self.create_streamed_response(
            document,
            format_name,
            StatusCode::OK,
            HeaderMap::new(),
            &WriterOptions::new(),
        )
    }

    /// A 200 response offering the document as a file download
    pub fn create_download_response(
        &self,
        document: Arc<Workbook>,
        format_name: &str,
        filename: &str,
    ) -> Result<StreamedResponse> {
        let writer = self.create_writer(document, format_name)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(writer.content_type())?);
        headers.insert(CONTENT_DISPOSITION, content_disposition(filename)?);

        let body = StreamBody::new(move |sink| writer.save(sink));
        Ok(StreamedResponse::new(body, StatusCode::OK, headers))
    }

    /// Registered writer format names
    pub fn writer_formats(&self) -> Vec<&str> {
        self.registry.writer_names()
    }

    /// Registered reader format names
    pub fn reader_formats(&self) -> Vec<&str> {
        self.registry.reader_names()
    }

    fn writer_defaults_for(&self, format: &str) -> Option<&WriterOptions> {
        self.config.writer_defaults.get(format)
    }
}

/// `attachment` disposition with an ASCII fallback name and, for non-ASCII
/// names, an RFC 5987 `filename*` parameter.
fn content_disposition(filename: &str) -> std::result::Result<HeaderValue, InvalidHeaderValue> {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut value = format!("attachment; filename=\"{fallback}\"");
    if !filename.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        for byte in filename.bytes() {
            if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
                value.push(byte as char);
            } else {
                value.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    HeaderValue::from_str(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("report.xlsx").unwrap(),
            "attachment; filename=\"report.xlsx\""
        );
        assert_eq!(
            content_disposition("q\"3\".csv").unwrap(),
            "attachment; filename=\"q_3_.csv\""
        );
        assert_eq!(
            content_disposition("résumé.csv").unwrap(),
            "attachment; filename=\"r_sum_.csv\"; filename*=UTF-8''r%C3%A9sum%C3%A9.csv"
        );
    }

    #[test]
    fn test_factory_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Factory>();
    }

    #[test]
    fn test_builder_rejects_bad_defaults() {
        let err = Factory::builder()
            .writer_defaults("Csv", WriterOptions::new().set("setDelimiter", 5))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption(OptionError::InvalidArgument { .. })));

        let err = Factory::builder()
            .writer_defaults("Pdf", WriterOptions::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_defaults_keys_are_canonical() {
        let factory = Factory::builder()
            .writer_defaults("csv", WriterOptions::new().set("setDelimiter", ";"))
            .build()
            .unwrap();
        let keys: Vec<&str> = factory
            .config()
            .writer_defaults
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["Csv"]);
    }

    #[test]
    fn test_duplicate_defaults_are_rejected() {
        let config: FactoryConfig = serde_json::from_str(
            r#"{"writer_defaults": {"csv": {"setDelimiter": ";"}, "Csv": {"setDelimiter": "|"}}}"#,
        )
        .unwrap();
        let err = Factory::with_config(config).unwrap_err();
        assert!(matches!(err, Error::DuplicateDefaults(ref name) if name == "Csv"));
        assert_eq!(err.to_string(), "writer defaults for [Csv] are given more than once");
    }

    #[test]
    fn test_config_from_json() {
        let config: FactoryConfig = serde_json::from_str(
            r#"{"writer_defaults": {"csv": {"setDelimiter": ";"}}}"#,
        )
        .unwrap();
        assert!(!config.strict_options);

        let factory = Factory::with_config(config).unwrap();
        let workbook = Arc::new(Workbook::new());
        let writer = factory.create_writer(workbook, "Csv").unwrap();
        let csv = writer
            .as_any()
            .downcast_ref::<crate::writer::BoundWriter<sheetfactory_csv::CsvWriter>>()
            .unwrap();
        assert_eq!(csv.backend().options().delimiter, b';');
    }
}
