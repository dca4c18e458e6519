//! Integration tests for exporting a comparison run

mod common;

use common::*;
use fitcompare::export::{export_run, ExportFormat};
use fitcompare::logging::RunReport;
use fitcompare::{compare_documents, BatchConfig, BatchDecoder, CompareOptions, ComparisonRun, Locale};
use std::path::Path;
use tempfile::tempdir;

fn run_in(dir: &Path) -> ComparisonRun {
    let paths = vec![
        write(dir, "ride.fit", &activity(SPORT_CYCLING, &steady_samples(3))),
        write(dir, "run.fit", &activity(SPORT_RUNNING, &steady_samples(5))),
        write(dir, "broken.fit", b"\x0e\x10garbage"),
    ];
    let decoder = BatchDecoder::with_config(BatchConfig {
        num_threads: None,
        show_progress: false,
    });
    let (decoded, _) = decoder.decode_files(&paths).unwrap();
    compare_documents(&decoded, &CompareOptions::default()).unwrap()
}

#[test]
fn test_csv_export_writes_summary_and_overlays() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let run = run_in(input.path());

    let written = export_run(&run, ExportFormat::Csv, output.path(), Locale::En).unwrap();
    assert_eq!(written.len(), 5);
    assert!(written[0].ends_with("summary.csv"));

    let summary = std::fs::read_to_string(output.path().join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("ride.fit,cycling"));

    let hr = std::fs::read_to_string(output.path().join("overlay_heartRate.csv")).unwrap();
    let lines: Vec<&str> = hr.lines().collect();
    assert_eq!(lines[0], "label,ride.fit,run.fit");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "00:00:00,120,120");
    assert_eq!(lines[5], "00:00:04,,124");
}

#[test]
fn test_json_export_contains_whole_run() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let run = run_in(input.path());

    let written = export_run(&run, ExportFormat::Json, output.path(), Locale::En).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();

    assert_eq!(json["summaries"].as_array().unwrap().len(), 2);
    assert_eq!(json["overlays"].as_array().unwrap().len(), 4);
    assert_eq!(json["diagnostics"][0]["file_name"], "broken.fit");
    assert_eq!(json["diagnostics"][0]["issue"]["kind"], "decode_failure");
    assert_eq!(json["files"][1]["sport"], "running");
}

#[test]
fn test_table_export_is_localized() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let run = run_in(input.path());

    let written = export_run(&run, ExportFormat::Table, output.path(), Locale::Zh).unwrap();
    let table = std::fs::read_to_string(&written[0]).unwrap();
    assert!(table.contains("文件名"));
    assert!(table.contains("run.fit"));

    let (rows, skipped) = table.split_once("Skipped:").unwrap();
    assert!(!rows.contains("broken.fit"));
    assert!(skipped.contains("  broken.fit: decode failure"));
    assert!(skipped.contains("处理耗时："));
}

#[test]
fn test_run_report_round_trip() {
    let input = tempdir().unwrap();
    let run = run_in(input.path());

    let report = RunReport::from_run("compare", &run, 3);
    let path = input.path().join("report.json");
    report.save_to_file(&path).unwrap();

    let loaded: RunReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(loaded.success);
    assert_eq!(loaded.files_total, 3);
    assert_eq!(loaded.files_charted, 2);
    assert_eq!(loaded.diagnostics.len(), 1);
}
