//! Tab-separated report writer.
//!
//! The report starts with a generation timestamp and a column header, then one
//! line per sub type (or one `ERROR` line per failed pair). Each line is flushed
//! and synced before the write returns, so a partially written report is valid
//! up to its last line.

use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::contract::{ReportRow, ReportSink, RowCells, TimeRange};

pub const COLUMN_HEADER: &str =
    "Form\tField Office/Service Center\tProcessing time range\tForm type\tCase inquiry date";
pub const ERROR_MARKER: &str = "ERROR";
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// A writer whose contents can be made durable on demand.
pub trait DurableWrite: Write {
    fn make_durable(&mut self) -> io::Result<()>;
}

impl DurableWrite for File {
    fn make_durable(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_data()
    }
}

impl DurableWrite for io::Stdout {
    fn make_durable(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl DurableWrite for Vec<u8> {
    fn make_durable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `"<upper> <unit> to <lower> <unit>"` with one fractional digit.
pub fn render_range(range: &TimeRange) -> String {
    format!(
        "{:.1} {} to {:.1} {}",
        range.upper.value, range.upper.unit, range.lower.value, range.lower.unit
    )
}

/// Renders a row without its trailing newline.
pub fn render_row(row: &ReportRow) -> String {
    match &row.cells {
        RowCells::Times {
            range,
            sub_type_info,
            service_request_date,
        } => format!(
            "{}\t{}\t{}\t{}\t{}",
            row.form,
            row.office,
            render_range(range),
            sub_type_info.trim(),
            service_request_date
        ),
        RowCells::Error => format!(
            "{}\t{}\t{m}\t{m}\t{m}",
            row.form,
            row.office,
            m = ERROR_MARKER
        ),
    }
}

pub struct ReportWriter<W: DurableWrite> {
    out: W,
    generated_at: NaiveDateTime,
}

impl ReportWriter<File> {
    /// Creates (or truncates) the report file at `path`.
    pub fn create<P: AsRef<Path>>(path: P, generated_at: NaiveDateTime) -> io::Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Created report file");
        Ok(ReportWriter::new(file, generated_at))
    }
}

impl<W: DurableWrite> ReportWriter<W> {
    pub fn new(out: W, generated_at: NaiveDateTime) -> Self {
        ReportWriter { out, generated_at }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.make_durable()
    }
}

impl<W: DurableWrite> ReportSink for ReportWriter<W> {
    fn write_header(&mut self) -> io::Result<()> {
        let stamp = format!(
            "Report generated at: {}",
            self.generated_at.format(TIMESTAMP_FORMAT)
        );
        self.write_line(&stamp)?;
        self.write_line(COLUMN_HEADER)
    }

    fn write_row(&mut self, row: &ReportRow) -> io::Result<()> {
        let line = render_row(row);
        self.write_line(&line)
    }
}
