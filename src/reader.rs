//! # Detector Export Ingest
//!
//! Reads one detector export into a [`TraceFile`].
//!
//! Two source formats are supported:
//!
//! - **`.xlsx` workbooks** with a `Raw Data` worksheet in the instrument
//!   export layout: a `Channel ID` marker row followed by one row per
//!   channel (id in the marker column, detector type in the next column),
//!   and an `RT (mins)` marker row followed by the timestamp column with one
//!   adjacent data column per channel, each block terminated by a blank
//!   cell.
//! - **`.csv` traces** with a header row naming the time column followed by
//!   one detector per column.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chronorm::reader::load_trace_file;
//!
//! let file = load_trace_file("run_01.xlsx".as_ref())?;
//! println!("{} channels, {} points", file.channels().len(), file.point_count());
//! # Ok::<(), chronorm::reader::ReadError>(())
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use log::{debug, info};
use serde::Serialize;

use crate::trace::{Channel, TraceError, TraceFile};

/// Worksheet the instrument export stores raw traces in.
pub const RAW_DATA_SHEET: &str = "Raw Data";

/// Marker cell opening the channel table.
const CHANNEL_MARKER: &str = "Channel ID";

/// Marker cell opening the timestamp column.
const TIME_MARKER: &str = "RT (mins)";

/// Errors raised while reading a detector export.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// I/O error while opening the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be opened or parsed.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// A CSV trace could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required marker cell is missing from the raw data sheet.
    #[error("marker '{0}' not found in the raw data sheet")]
    MarkerNotFound(&'static str),

    /// A cell that should hold a number holds something else.
    #[error("expected a number at row {row}, column {col} of '{source_name}', found '{found}'")]
    NonNumericCell {
        /// Worksheet or file the cell belongs to.
        source_name: String,
        /// 1-based row of the offending cell.
        row: usize,
        /// 1-based column of the offending cell.
        col: usize,
        /// Textual rendering of what was found.
        found: String,
    },

    /// The channel table is empty.
    #[error("no detector channels declared under 'Channel ID'")]
    NoChannels,

    /// The timestamp column is empty.
    #[error("time column under 'RT (mins)' is empty")]
    EmptyTime,

    /// The assembled data violated the trace file invariants.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// The input extension maps to no known reader.
    #[error("unsupported input '{0}', expected a .xlsx or .csv file")]
    UnsupportedExtension(PathBuf),
}

/// Load one detector export, dispatching on the file extension.
pub fn load_trace_file(path: &Path) -> Result<TraceFile, ReadError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let file = match extension.as_str() {
        "xlsx" => read_xlsx(path)?,
        "csv" => read_csv(path)?,
        _ => return Err(ReadError::UnsupportedExtension(path.to_path_buf())),
    };

    info!(
        "loaded {}: {} channels, {} points",
        file.display_name(),
        file.channels().len(),
        file.point_count()
    );
    Ok(file)
}

/// Read a `Raw Data` workbook export.
fn read_xlsx(path: &Path) -> Result<TraceFile, ReadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(RAW_DATA_SHEET)?;
    let rows: Vec<&[Data]> = range.rows().collect();

    // Channel table: one row per channel below the marker, id then type.
    let channel_row = rows
        .iter()
        .position(|r| cell_text(r.first()).as_deref() == Some(CHANNEL_MARKER))
        .ok_or(ReadError::MarkerNotFound(CHANNEL_MARKER))?;

    let mut channels = Vec::new();
    for row in rows.iter().skip(channel_row + 1) {
        let Some(id) = cell_text(row.first()) else {
            break;
        };
        let detector = cell_text(row.get(1)).unwrap_or_else(|| id.clone());
        channels.push(Channel::new(id, detector));
    }
    if channels.is_empty() {
        return Err(ReadError::NoChannels);
    }

    // Timestamp column below the time marker, terminated by a blank cell.
    let time_row = rows
        .iter()
        .position(|r| cell_text(r.first()).as_deref() == Some(TIME_MARKER))
        .ok_or(ReadError::MarkerNotFound(TIME_MARKER))?;

    let mut time = Vec::new();
    for (offset, row) in rows.iter().enumerate().skip(time_row + 1) {
        match row.first() {
            None | Some(Data::Empty) => break,
            Some(cell) => time.push(numeric_cell(cell).ok_or_else(|| {
                non_numeric(RAW_DATA_SHEET, offset, 0, cell)
            })?),
        }
    }
    if time.is_empty() {
        return Err(ReadError::EmptyTime);
    }

    // One data column per channel, adjacent to the timestamp column and
    // parallel to it.
    let mut points = HashMap::new();
    for (i, channel) in channels.iter().enumerate() {
        let col = i + 1;
        let mut data = Vec::with_capacity(time.len());
        for (offset, row) in rows
            .iter()
            .enumerate()
            .skip(time_row + 1)
            .take(time.len())
        {
            match row.get(col) {
                None | Some(Data::Empty) => break,
                Some(cell) => data.push(numeric_cell(cell).ok_or_else(|| {
                    non_numeric(RAW_DATA_SHEET, offset, col, cell)
                })?),
            }
        }
        debug!(
            "read {} points for detector '{}'",
            data.len(),
            channel.detector
        );
        points.insert(channel.detector.clone(), data);
    }

    Ok(TraceFile::new(path, time, channels, points)?)
}

/// Read a CSV trace: header row `time,<detector>,...`, numeric rows after.
fn read_csv(path: &Path) -> Result<TraceFile, ReadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let detectors: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if detectors.is_empty() {
        return Err(ReadError::NoChannels);
    }
    let channels: Vec<Channel> = detectors
        .iter()
        .enumerate()
        .map(|(i, d)| Channel::new(format!("{}", i + 1), d.as_str()))
        .collect();

    let mut time = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); detectors.len()];
    let file_name = path.display().to_string();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (col, field) in record.iter().enumerate() {
            let value: f64 =
                field
                    .trim()
                    .parse()
                    .map_err(|_| ReadError::NonNumericCell {
                        source_name: file_name.clone(),
                        // +2: one for the header row, one for 1-based rows.
                        row: row + 2,
                        col: col + 1,
                        found: field.to_string(),
                    })?;
            if col == 0 {
                time.push(value);
            } else if let Some(column) = columns.get_mut(col - 1) {
                column.push(value);
            }
        }
    }
    if time.is_empty() {
        return Err(ReadError::EmptyTime);
    }

    let points: HashMap<String, Vec<f64>> =
        detectors.into_iter().zip(columns).collect();
    Ok(TraceFile::new(path, time, channels, points)?)
}

/// Text content of a cell, trimmed; `None` for blank cells.
fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell {
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Data::Float(f)) => Some(f.to_string()),
        Some(Data::Int(i)) => Some(i.to_string()),
        _ => None,
    }
}

/// Numeric content of a cell. Strings holding a parseable number are
/// accepted, everything else is rejected.
fn numeric_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_numeric(sheet: &str, row: usize, col: usize, cell: &Data) -> ReadError {
    ReadError::NonNumericCell {
        source_name: sheet.to_string(),
        row: row + 1,
        col: col + 1,
        found: format!("{cell}"),
    }
}

/// Summary of one loaded file, for the `info` command and logs.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    /// Path the file was loaded from.
    pub path: String,
    /// Number of declared channels.
    pub channel_count: usize,
    /// Detector keys, in source order.
    pub detectors: Vec<String>,
    /// Number of time points.
    pub points: usize,
    /// First timestamp, if any.
    pub time_start: Option<f64>,
    /// Last timestamp, if any.
    pub time_stop: Option<f64>,
    /// Uniform sampling step, when derivable.
    pub time_step: Option<f64>,
}

impl FileSummary {
    /// Summarize a loaded trace file.
    pub fn from_file(file: &TraceFile) -> Self {
        Self {
            path: file.path().display().to_string(),
            channel_count: file.channels().len(),
            detectors: file
                .channels()
                .iter()
                .map(|c| c.detector.clone())
                .collect(),
            points: file.point_count(),
            time_start: file.time().first().copied(),
            time_stop: file.time().last().copied(),
            time_step: file.time_step().ok(),
        }
    }
}
