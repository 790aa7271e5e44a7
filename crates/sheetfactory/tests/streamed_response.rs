//! Streamed responses: deferred bodies, status, headers and writer options

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::HeaderValue;
use pretty_assertions::assert_eq;
use sheetfactory::prelude::*;
use sheetfactory::{Error, WriteError};

fn sample_workbook() -> Workbook {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", "name").unwrap();
    sheet.set_cell_value("B1", "qty").unwrap();
    sheet.set_cell_value("A2", "bolt").unwrap();
    sheet.set_cell_value("B2", 40.0).unwrap();
    wb
}

/// Sink that counts `write` calls
#[derive(Default)]
struct CountingSink {
    writes: usize,
    bytes: Vec<u8>,
}

impl Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that records how often it serializes
struct CountingWriter {
    document: Arc<Workbook>,
    saves: Arc<AtomicUsize>,
}

impl SpreadsheetWriter for CountingWriter {
    fn format(&self) -> &str {
        "Counting"
    }

    fn document(&self) -> &Arc<Workbook> {
        &self.document
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn option_names(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn set_option(
        &mut self,
        _operation: &str,
        _args: &[serde_json::Value],
    ) -> Result<bool, sheetfactory::OptionError> {
        Ok(false)
    }

    fn save(self: Box<Self>, sink: &mut dyn Write) -> Result<(), WriteError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        write!(sink, "{} sheet(s)", self.document.sheet_count())?;
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn test_csv_with_delimiter_option() {
    let factory = Factory::new();
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));

    let response = factory
        .create_streamed_response(
            Arc::new(sample_workbook()),
            "Csv",
            StatusCode::OK,
            headers,
            &WriterOptions::new().set("setDelimiter", ";"),
        )
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");

    let mut body = Vec::new();
    response.send_to(&mut body).unwrap();
    assert_eq!(String::from_utf8(body).unwrap(), "name;qty\nbolt;40\n");
}

#[test]
fn test_body_is_deferred_until_sent() {
    let saves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&saves);
    let factory = Factory::builder()
        .register_writer("Counting", move |document| {
            Box::new(CountingWriter {
                document,
                saves: Arc::clone(&counter),
            }) as Box<dyn SpreadsheetWriter>
        })
        .build()
        .unwrap();

    let response = factory
        .stream(Arc::new(sample_workbook()), "Counting")
        .unwrap();
    assert_eq!(saves.load(Ordering::SeqCst), 0);

    let mut sink = CountingSink::default();
    response.send_to(&mut sink).unwrap();
    assert_eq!(saves.load(Ordering::SeqCst), 1);
    assert_eq!(sink.bytes, b"1 sheet(s)");
}

#[test]
fn test_no_sink_writes_before_drain() {
    let factory = Factory::new();
    let response = factory.stream(Arc::new(sample_workbook()), "Xlsx").unwrap();

    let (status, headers, body) = response.into_parts();
    assert_eq!(status, StatusCode::OK);
    assert!(headers.is_empty());

    let mut sink = CountingSink::default();
    assert_eq!(sink.writes, 0);
    body.write_to(&mut sink).unwrap();
    assert!(sink.writes > 0);
    assert!(sink.bytes.starts_with(b"PK\x03\x04"));
}

#[test]
fn test_custom_status_and_headers_are_kept() {
    let factory = Factory::new();
    let mut headers = HeaderMap::new();
    headers.insert("x-report", HeaderValue::from_static("weekly"));

    let response = factory
        .create_streamed_response(
            Arc::new(sample_workbook()),
            "Html",
            StatusCode::ACCEPTED,
            headers,
            &WriterOptions::new(),
        )
        .unwrap()
        .into_http();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(response.headers()["x-report"], "weekly");

    let html = String::from_utf8(response.into_body().into_bytes().unwrap()).unwrap();
    assert!(html.contains("<td class=\"s\">bolt</td><td class=\"n\">40</td>"));
}

#[test]
fn test_unknown_format_fails_before_response() {
    let err = Factory::new()
        .stream(Arc::new(Workbook::new()), "Pdf")
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert_eq!(err.to_string(), "the writer [Pdf] does not exist or is not supported");
}

#[test]
fn test_bad_option_argument_fails_before_response() {
    let err = Factory::new()
        .create_streamed_response(
            Arc::new(Workbook::new()),
            "Csv",
            StatusCode::OK,
            HeaderMap::new(),
            &WriterOptions::new().set("setUseBOM", "yes"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));
}

#[test]
fn test_write_errors_surface_when_drained() {
    let response = Factory::new()
        .create_streamed_response(
            Arc::new(Workbook::new()),
            "Csv",
            StatusCode::OK,
            HeaderMap::new(),
            &WriterOptions::new().set("setSheetIndex", 4),
        )
        .unwrap();

    let err = response.send_to(&mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, WriteError::Csv(_)));
}

/// Writer whose output target refuses the document
struct RejectingWriter {
    document: Arc<Workbook>,
}

impl SpreadsheetWriter for RejectingWriter {
    fn format(&self) -> &str {
        "Rejecting"
    }

    fn document(&self) -> &Arc<Workbook> {
        &self.document
    }

    fn content_type(&self) -> &'static str {
        "application/octet-stream"
    }

    fn file_extension(&self) -> &'static str {
        "bin"
    }

    fn option_names(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn set_option(
        &mut self,
        _operation: &str,
        _args: &[serde_json::Value],
    ) -> Result<bool, sheetfactory::OptionError> {
        Ok(false)
    }

    fn save(self: Box<Self>, _sink: &mut dyn Write) -> Result<(), WriteError> {
        Err(WriteError::other(format!(
            "{} sheet(s) exceed the export quota",
            self.document.sheet_count()
        )))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn test_custom_writer_errors_surface_when_drained() {
    let factory = Factory::builder()
        .register_writer("Rejecting", |document| {
            Box::new(RejectingWriter { document }) as Box<dyn SpreadsheetWriter>
        })
        .build()
        .unwrap();

    let response = factory.stream(Arc::new(sample_workbook()), "rejecting").unwrap();
    let mut sink = CountingSink::default();
    let err = response.send_to(&mut sink).unwrap_err();

    assert!(matches!(err, WriteError::Other(_)));
    assert_eq!(err.to_string(), "1 sheet(s) exceed the export quota");
    assert_eq!(sink.writes, 0);
}

#[test]
fn test_download_response_headers() {
    let response = Factory::new()
        .create_download_response(Arc::new(sample_workbook()), "xlsx", "stock report.xlsx")
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"stock report.xlsx\""
    );
}

#[test]
fn test_response_can_move_across_threads() {
    let response = Factory::new()
        .stream(Arc::new(sample_workbook()), "Csv")
        .unwrap();

    let body = std::thread::spawn(move || {
        let mut out = Vec::new();
        response.send_to(&mut out).map(|_| out)
    })
    .join()
    .unwrap()
    .unwrap();
    assert_eq!(body, b"name,qty\nbolt,40\n");
}
