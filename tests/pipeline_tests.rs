//! End-to-end tests: FIT bytes on disk through batch decoding to a
//! comparison run

mod common;

use common::*;
use fitcompare::import::collect_activity_files;
use fitcompare::import::fit::{decode_bytes, FitDecoder};
use fitcompare::{
    compare_documents, BatchConfig, BatchDecoder, CompareOptions, CoordinateMode, DecodeError,
    FileIssue, FitCompareError, Metric, OverlayAlignment, TimestampZone,
};
use tempfile::tempdir;

fn quiet_decoder() -> BatchDecoder {
    BatchDecoder::with_config(BatchConfig {
        num_threads: Some(2),
        show_progress: false,
    })
}

#[test]
fn test_decode_synthetic_activity() {
    let bytes = activity(SPORT_RUNNING, &steady_samples(4));
    let document = decode_bytes(&bytes, false).unwrap();

    assert_eq!(document.sessions.len(), 1);
    assert_eq!(document.sport(), "running");
    assert_eq!(document.record_count(), 4);
    assert_eq!(document.events.len(), 1);

    let records = &document.sessions[0].laps[0].records;
    assert_eq!(records[0].elapsed_time, 0.0);
    assert_eq!(records[3].elapsed_time, 3.0);
    assert_eq!(records[1].heart_rate, Some(121.0));
    assert!((records[0].speed.unwrap() - 18.0).abs() < 1e-9);
    assert!((records[3].distance.unwrap() - 0.03).abs() < 1e-9);
    assert!((records[0].altitude.unwrap() - 0.1).abs() < 1e-9);
}

#[test]
fn test_compare_files_end_to_end() {
    let dir = tempdir().unwrap();
    let paths = vec![
        write(dir.path(), "short.fit", &activity(SPORT_CYCLING, &steady_samples(3))),
        write(dir.path(), "long.fit", &activity(SPORT_CYCLING, &steady_samples(5))),
    ];

    let (decoded, summary) = quiet_decoder().decode_files(&paths).unwrap();
    assert!(summary.is_fully_successful());

    let run = compare_documents(&decoded, &CompareOptions::default()).unwrap();
    assert_eq!(run.summaries.len(), 2);
    assert_eq!(run.summaries[0].file_name, "short.fit");
    assert_eq!(run.summaries[0].sport, "cycling");
    assert_eq!(run.summaries[0].total_time, "00:00:02");
    assert_eq!(run.summaries[1].total_time, "00:00:04");

    let speed = run.overlays.iter().find(|o| o.metric == Metric::Speed).unwrap();
    assert_eq!(speed.labels.len(), 5);
    assert_eq!(speed.labels[4], "00:00:04");
    assert_eq!(speed.series[0].values, vec![18.0, 18.0, 18.0]);

    let altitude = run.overlays.iter().find(|o| o.metric == Metric::Altitude).unwrap();
    assert_eq!(altitude.series[1].values[0], 100.0);
}

#[test]
fn test_distance_axis_with_padding() {
    let dir = tempdir().unwrap();
    let paths = vec![
        write(dir.path(), "a.fit", &activity(SPORT_RUNNING, &steady_samples(2))),
        write(dir.path(), "b.fit", &activity(SPORT_RUNNING, &steady_samples(4))),
    ];
    let (decoded, _) = quiet_decoder().decode_files(&paths).unwrap();

    let options = CompareOptions {
        mode: CoordinateMode::Distance,
        zone: TimestampZone::Utc,
        alignment: OverlayAlignment::PadWithGaps,
    };
    let run = compare_documents(&decoded, &options).unwrap();

    let hr = run.overlays.iter().find(|o| o.metric == Metric::HeartRate).unwrap();
    assert_eq!(hr.labels.last().map(String::as_str), Some("0.03 km"));
    assert_eq!(hr.series[0].values.len(), 4);
    assert_eq!(hr.series[0].values[..2], [120.0, 121.0]);
    assert!(hr.series[0].values[3].is_nan());
    assert_eq!(run.summaries[0].start_time, "2024/06/01 06:00:00 AM");
}

#[test]
fn test_broken_files_are_isolated() {
    let dir = tempdir().unwrap();
    let paths = vec![
        write(dir.path(), "garbage.fit", b"definitely not a FIT file"),
        write(dir.path(), "orphan.fit", &records_only(&steady_samples(3))),
        write(dir.path(), "empty.fit", &activity(SPORT_RUNNING, &[])),
        write(dir.path(), "good.fit", &activity(SPORT_RUNNING, &steady_samples(3))),
        dir.path().join("missing.fit"),
    ];

    let (decoded, summary) = quiet_decoder().decode_files(&paths).unwrap();
    assert_eq!(summary.failed_files, 2);
    assert!(matches!(decoded[4].document, Err(DecodeError::FileNotFound { .. })));

    let run = compare_documents(&decoded, &CompareOptions::default()).unwrap();
    let summarized: Vec<&str> = run.summaries.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(summarized, vec!["empty.fit", "good.fit"]);
    assert_eq!(run.files.len(), 1);

    let issues: Vec<(&str, &FileIssue)> = run
        .diagnostics
        .iter()
        .map(|d| (d.file_name.as_str(), &d.issue))
        .collect();
    assert!(matches!(issues[0], ("garbage.fit", FileIssue::DecodeFailure { .. })));
    assert_eq!(issues[1], ("orphan.fit", &FileIssue::MissingSession));
    assert_eq!(issues[2], ("empty.fit", &FileIssue::EmptyRecordSet));
    assert!(matches!(issues[3], ("missing.fit", FileIssue::DecodeFailure { .. })));
}

#[test]
fn test_all_files_unusable() {
    let dir = tempdir().unwrap();
    let paths = vec![write(dir.path(), "orphan.fit", &records_only(&steady_samples(2)))];
    let (decoded, _) = quiet_decoder().decode_files(&paths).unwrap();

    let err = compare_documents(&decoded, &CompareOptions::default()).unwrap_err();
    assert!(matches!(err, FitCompareError::NoUsableFiles));
    assert!(err.user_message().contains("None of the selected files"));
}

#[test]
fn test_lenient_decoding_ignores_bad_checksum() {
    let mut bytes = activity(SPORT_RUNNING, &steady_samples(2));
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    assert!(matches!(decode_bytes(&bytes, false), Err(DecodeError::Corrupted { .. })));
    let document = decode_bytes(&bytes, true).unwrap();
    assert_eq!(document.record_count(), 2);
}

#[test]
fn test_directory_inputs_keep_order() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b.fit", &activity(SPORT_RUNNING, &steady_samples(2)));
    write(dir.path(), "a.fit", &activity(SPORT_RUNNING, &steady_samples(2)));
    write(dir.path(), "readme.txt", b"notes");

    let paths = collect_activity_files(&[dir.path().to_path_buf()], &FitDecoder::new()).unwrap();
    let (decoded, _) = quiet_decoder().decode_files(&paths).unwrap();
    let names: Vec<&str> = decoded.iter().map(|d| d.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.fit", "b.fit"]);
}
