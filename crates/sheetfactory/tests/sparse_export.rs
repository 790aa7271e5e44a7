//! Exports of sparse sheets stay within a small memory budget.
//!
//! The whole file is one test so the allocation counter sees no other work.

use std::alloc::{GlobalAlloc, Layout, System};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use sheetfactory::prelude::*;

struct PeakAlloc;

static CURRENT: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for PeakAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let now = CURRENT.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
            PEAK.fetch_max(now, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        CURRENT.fetch_sub(layout.size(), Ordering::Relaxed);
    }
}

#[global_allocator]
static ALLOC: PeakAlloc = PeakAlloc;

/// Bytes allocated on top of the baseline while exporting
const BUDGET: usize = 32 * 1024 * 1024;

/// Sink that keeps only counters and the last few bytes
#[derive(Default)]
struct TailSink {
    bytes: usize,
    lines: usize,
    tail: Vec<u8>,
}

impl Write for TailSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes += buf.len();
        self.lines += buf.iter().filter(|b| **b == b'\n').count();
        self.tail.extend_from_slice(buf);
        let excess = self.tail.len().saturating_sub(64);
        self.tail.drain(..excess);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn corner_workbook(far: &str) -> Arc<Workbook> {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", "top").unwrap();
    sheet.set_cell_value(far, "far").unwrap();
    Arc::new(wb)
}

fn export_peak(factory: &Factory, workbook: Arc<Workbook>, format: &str) -> (usize, TailSink) {
    let response = factory.stream(workbook, format).unwrap();
    let mut sink = TailSink::default();

    let baseline = CURRENT.load(Ordering::Relaxed);
    PEAK.store(baseline, Ordering::Relaxed);
    response.send_to(&mut sink).unwrap();
    let peak = PEAK.load(Ordering::Relaxed) - baseline;
    (peak, sink)
}

#[test]
fn test_far_corner_exports_row_by_row() {
    let factory = Factory::new();

    // 2000 x 16384 cells when laid out densely
    let (peak, csv) = export_peak(&factory, corner_workbook("XFD2000"), "Csv");
    assert!(peak < BUDGET, "CSV export peaked at {peak} bytes");
    assert_eq!(csv.lines, 2000);
    assert!(csv.tail.ends_with(b",,far\n"));

    let (peak, html) = export_peak(&factory, corner_workbook("XFD200"), "Html");
    assert!(peak < BUDGET, "HTML export peaked at {peak} bytes");
    assert!(html.bytes > 200 * 16384);
    assert!(html.tail.ends_with(b"</html>\n"));
}
