//! # Workbook Export
//!
//! Maps result records to an output workbook with embedded line charts.
//! The computation stages emit plain records; everything about cells,
//! sheets and charts lives here.
//!
//! Layout:
//!
//! - a `Summary` sheet with run provenance (tool version, timestamp,
//!   inputs, ranges, mode);
//! - kinetic mode: one sheet per detector, one column block and one chart
//!   per range, one curve per file within each block;
//! - height mode: one sheet per input file, one column block and one chart
//!   per range, one curve per channel within each block.

use std::path::Path;

use log::info;
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet};

use crate::range::TimeRange;
use crate::reader::RAW_DATA_SHEET;
use crate::results::{Mode, ResultStore};
use crate::trace::{Channel, TraceFile};

/// Errors raised while writing the output workbook.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The workbook writer rejected an operation.
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Neither height nor kinetic results were available to write.
    #[error("nothing to export: no results were produced")]
    NoResults,
}

/// Counters reported after an export.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportStats {
    /// Worksheets written, the summary sheet included.
    pub sheets_written: usize,
    /// Line charts embedded.
    pub charts_written: usize,
    /// Curves (columns of normalized values) written.
    pub curves_written: usize,
}

/// One column block on a sheet, remembered so its chart can reference it.
struct ColumnBlock {
    title: String,
    time_col: u16,
    series: Vec<(u16, String)>,
    rows: u32,
}

/// Write all results to one workbook at `path`.
pub fn export_workbook(
    path: &Path,
    files: &[TraceFile],
    store: &ResultStore,
    ranges: &[TimeRange],
    mode: Mode,
) -> Result<ExportStats, ExportError> {
    let has_height = files.iter().any(|f| !f.results().is_empty());
    if store.is_empty() && !has_height {
        return Err(ExportError::NoResults);
    }

    let mut workbook = Workbook::new();
    let mut stats = ExportStats::default();
    let mut taken_names = Vec::new();

    write_summary_sheet(workbook.add_worksheet(), files, ranges, mode)?;
    taken_names.push("Summary".to_string());
    stats.sheets_written += 1;

    if mode.includes_kinetic() {
        for detector in store.detectors() {
            let name = sheet_name(&format!("kinetic {detector}"), &mut taken_names);
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name.as_str())?;

            let mut blocks = Vec::new();
            let mut col: u16 = 0;
            for range_key in store.range_keys() {
                let results: Vec<_> = store.kinetic_for(detector, range_key).collect();
                if results.is_empty() {
                    continue;
                }
                let rows = results.iter().map(|r| r.time.len()).max().unwrap_or(0);
                let mut block = ColumnBlock {
                    title: range_key.clone(),
                    time_col: col,
                    series: Vec::new(),
                    rows: rows as u32,
                };
                write_column(worksheet, col, "RT (mins)", &results[0].time)?;
                col += 1;
                for result in results {
                    write_column(worksheet, col, &result.file_name, &result.values)?;
                    block.series.push((col, result.file_name.clone()));
                    col += 1;
                    stats.curves_written += 1;
                }
                blocks.push(block);
                col += 1; // spacer between range blocks
            }

            stats.charts_written += insert_block_charts(worksheet, &name, &blocks)?;
            stats.sheets_written += 1;
        }
    }

    if mode.includes_height() {
        for file in files {
            if file.results().is_empty() {
                continue;
            }
            let name = sheet_name(&format!("height {}", file.display_name()), &mut taken_names);
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name.as_str())?;

            let mut blocks: Vec<ColumnBlock> = Vec::new();
            let mut col: u16 = 0;
            for result in file.results() {
                let block_title = format!("{} - {}", result.start_time, result.stop_time);
                let new_block = match blocks.last() {
                    Some(block) => block.title != block_title,
                    None => true,
                };
                if new_block {
                    if !blocks.is_empty() {
                        col += 1; // spacer between range blocks
                    }
                    write_column(worksheet, col, "RT (mins)", &result.time)?;
                    blocks.push(ColumnBlock {
                        title: block_title,
                        time_col: col,
                        series: Vec::new(),
                        rows: result.time.len() as u32,
                    });
                    col += 1;
                }
                write_column(worksheet, col, &result.detector, &result.values)?;
                if let Some(block) = blocks.last_mut() {
                    block.series.push((col, result.detector.clone()));
                }
                col += 1;
                stats.curves_written += 1;
            }

            stats.charts_written += insert_block_charts(worksheet, &name, &blocks)?;
            stats.sheets_written += 1;
        }
    }

    workbook.save(path)?;
    info!(
        "exported {}: {} sheets, {} charts, {} curves",
        path.display(),
        stats.sheets_written,
        stats.charts_written,
        stats.curves_written
    );
    Ok(stats)
}

/// Write a raw detector workbook in the instrument export layout this tool
/// ingests. Used by the demo generator and by tests.
pub fn write_raw_data_workbook(
    path: &Path,
    time: &[f64],
    channels: &[Channel],
    points: &[Vec<f64>],
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RAW_DATA_SHEET)?;

    worksheet.write_string(0, 0, "Channel ID")?;
    for (i, channel) in channels.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, channel.id.as_str())?;
        worksheet.write_string(row, 1, channel.detector.as_str())?;
    }

    // Blank row after the channel table terminates it for the reader.
    let marker_row = (channels.len() + 2) as u32;
    worksheet.write_string(marker_row, 0, "RT (mins)")?;
    for (i, t) in time.iter().enumerate() {
        let row = marker_row + 1 + i as u32;
        worksheet.write_number(row, 0, *t)?;
        for (c, data) in points.iter().enumerate() {
            if let Some(value) = data.get(i) {
                worksheet.write_number(row, (c + 1) as u16, *value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Write one header cell plus a column of numbers below it.
fn write_column(
    worksheet: &mut Worksheet,
    col: u16,
    header: &str,
    values: &[f64],
) -> Result<(), ExportError> {
    let bold = Format::new().set_bold();
    worksheet.write_string_with_format(0, col, header, &bold)?;
    for (i, value) in values.iter().enumerate() {
        worksheet.write_number((i + 1) as u32, col, *value)?;
    }
    Ok(())
}

/// Embed one line chart per column block, stacked below the data.
fn insert_block_charts(
    worksheet: &mut Worksheet,
    sheet: &str,
    blocks: &[ColumnBlock],
) -> Result<usize, ExportError> {
    let chart_row = blocks.iter().map(|b| b.rows).max().unwrap_or(0) + 2;
    let mut inserted = 0;

    for (i, block) in blocks.iter().enumerate() {
        if block.series.is_empty() || block.rows == 0 {
            continue;
        }
        let mut chart = Chart::new(ChartType::Line);
        chart.title().set_name(block.title.as_str());
        chart.x_axis().set_name("RT (mins)");
        chart.y_axis().set_name("Normalized response");

        let last_row = block.rows; // data starts at row 1
        for (col, series_name) in &block.series {
            chart
                .add_series()
                .set_name(series_name.as_str())
                .set_categories((sheet, 1, block.time_col, last_row, block.time_col))
                .set_values((sheet, 1, *col, last_row, *col));
        }

        // Default chart size is 8 columns by 15 rows; tile horizontally.
        worksheet.insert_chart(chart_row, (i * 9) as u16, &chart)?;
        inserted += 1;
    }

    Ok(inserted)
}

/// Run provenance sheet.
fn write_summary_sheet(
    worksheet: &mut Worksheet,
    files: &[TraceFile],
    ranges: &[TimeRange],
    mode: Mode,
) -> Result<(), ExportError> {
    let bold = Format::new().set_bold();
    worksheet.set_name("Summary")?;

    worksheet.write_string_with_format(0, 0, "chronorm", &bold)?;
    worksheet.write_string(0, 1, env!("CARGO_PKG_VERSION"))?;
    worksheet.write_string(1, 0, "Generated")?;
    worksheet.write_string(
        1,
        1,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    )?;
    worksheet.write_string(2, 0, "Mode")?;
    worksheet.write_string(2, 1, mode.to_string())?;
    worksheet.write_string(3, 0, "Ranges")?;
    let range_list = ranges
        .iter()
        .map(|r| r.key())
        .collect::<Vec<_>>()
        .join(", ");
    worksheet.write_string(3, 1, range_list)?;

    worksheet.write_string_with_format(5, 0, "Input", &bold)?;
    worksheet.write_string_with_format(5, 1, "Channels", &bold)?;
    worksheet.write_string_with_format(5, 2, "Points", &bold)?;
    for (i, file) in files.iter().enumerate() {
        let row = (6 + i) as u32;
        worksheet.write_string(row, 0, file.display_name())?;
        worksheet.write_number(row, 1, file.channels().len() as f64)?;
        worksheet.write_number(row, 2, file.point_count() as f64)?;
    }

    Ok(())
}

/// Build a legal, unique worksheet name from `base`.
///
/// Worksheet names are capped at 31 characters and must not contain
/// `[ ] : * ? / \`.
fn sheet_name(base: &str, taken: &mut Vec<String>) -> String {
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
            c => c,
        })
        .collect();
    let mut name: String = cleaned.chars().take(31).collect();

    let mut suffix = 2;
    while taken.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
        let tag = format!(" ({suffix})");
        let keep = 31usize.saturating_sub(tag.len());
        name = cleaned.chars().take(keep).collect::<String>() + &tag;
        suffix += 1;
    }

    taken.push(name.clone());
    name
}
