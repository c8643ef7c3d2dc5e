//! Integration tests for the workbook I/O boundary: write a raw detector
//! export, read it back, run the pipeline and export the results.

use calamine::{open_workbook, Data, Reader, Xlsx};
use tempfile::tempdir;

use chronorm::export::{export_workbook, write_raw_data_workbook};
use chronorm::pipeline::process;
use chronorm::range::TimeRange;
use chronorm::reader::load_trace_file;
use chronorm::results::Mode;
use chronorm::trace::Channel;

#[test]
fn raw_workbook_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run_a.xlsx");

    let time = vec![0.0, 1.0, 2.0, 3.0];
    let channels = vec![Channel::new("1", "UV_VIS_1"), Channel::new("2", "UV_VIS_2")];
    let points = vec![vec![5.0, 7.0, 9.0, 6.0], vec![1.0, 4.0, 2.0, 1.0]];

    write_raw_data_workbook(&path, &time, &channels, &points).unwrap();

    let file = load_trace_file(&path).unwrap();
    assert_eq!(file.time(), time.as_slice());
    assert_eq!(file.channels().len(), 2);
    assert_eq!(file.channels()[0].detector, "UV_VIS_1");
    assert_eq!(file.trace("UV_VIS_1").unwrap(), &[5.0, 7.0, 9.0, 6.0]);
    assert_eq!(file.trace("UV_VIS_2").unwrap(), &[1.0, 4.0, 2.0, 1.0]);
    assert_eq!(file.time_step().unwrap(), 1.0);
}

#[test]
fn full_pipeline_to_result_workbook() {
    let dir = tempdir().unwrap();
    let path_a = dir.path().join("run_a.xlsx");
    let path_b = dir.path().join("run_b.xlsx");
    let out = dir.path().join("results.xlsx");

    let time = vec![0.0, 1.0, 2.0, 3.0];
    let channels = vec![Channel::new("1", "UV")];
    write_raw_data_workbook(&path_a, &time, &channels, &[vec![5.0, 7.0, 9.0, 6.0]]).unwrap();
    write_raw_data_workbook(&path_b, &time, &channels, &[vec![1.0, 4.0, 2.0, 1.0]]).unwrap();

    let mut files = vec![
        load_trace_file(&path_a).unwrap(),
        load_trace_file(&path_b).unwrap(),
    ];
    let ranges = vec![TimeRange::new(0.0, 3.0).unwrap()];

    let store = process(&mut files, &ranges, Mode::Both).unwrap();
    let stats = export_workbook(&out, &files, &store, &ranges, Mode::Both).unwrap();

    // Summary + one kinetic sheet + one height sheet per file.
    assert_eq!(stats.sheets_written, 4);
    assert!(stats.charts_written >= 3);
    assert_eq!(stats.curves_written, 4);

    // Re-open the produced workbook and spot-check the layout.
    let mut workbook: Xlsx<_> = open_workbook(&out).unwrap();
    let names = workbook.sheet_names().to_vec();
    assert!(names.iter().any(|n| n == "Summary"));
    assert!(names.iter().any(|n| n == "kinetic UV"));
    assert!(names.iter().any(|n| n.starts_with("height run_a")));
    assert!(names.iter().any(|n| n.starts_with("height run_b")));

    let sheet = workbook.worksheet_range("kinetic UV").unwrap();
    // Header row: time column then one column per file.
    assert_eq!(
        sheet.get_value((0, 0)),
        Some(&Data::String("RT (mins)".to_string()))
    );
    assert_eq!(
        sheet.get_value((0, 1)),
        Some(&Data::String("run_a.xlsx".to_string()))
    );
    assert_eq!(
        sheet.get_value((0, 2)),
        Some(&Data::String("run_b.xlsx".to_string()))
    );

    // run_b peaks at exactly 1 (it holds the set-wide height maximum).
    match sheet.get_value((2, 2)) {
        Some(Data::Float(v)) => assert!((v - 1.0).abs() < 1e-9),
        other => panic!("expected a number, got {other:?}"),
    }
    // run_a row 2 column 1 carries 2 / 4.875.
    match sheet.get_value((2, 1)) {
        Some(Data::Float(v)) => assert!((v - 2.0 / 4.875).abs() < 1e-9),
        other => panic!("expected a number, got {other:?}"),
    }
}

#[test]
fn export_without_results_is_an_error() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("results.xlsx");
    let ranges = vec![TimeRange::new(0.0, 3.0).unwrap()];

    let store = chronorm::results::ResultStore::new();
    let err = export_workbook(&out, &[], &store, &ranges, Mode::Both).unwrap_err();
    assert!(matches!(err, chronorm::export::ExportError::NoResults));
    assert!(!out.exists());
}
