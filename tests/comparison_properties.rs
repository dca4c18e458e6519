//! Property tests for series building and overlay aggregation

use fitcompare::comparison::{aggregate, aggregate_all, reference_axis, OverlayAlignment};
use fitcompare::format::{format_time, parse_time};
use fitcompare::numeric::finite_bounds;
use fitcompare::{CoordinateMode, Metric, PerFileSeriesSet, Record};
use proptest::prelude::*;

fn records(hr: &[Option<u8>]) -> Vec<Record> {
    hr.iter()
        .enumerate()
        .map(|(i, h)| Record {
            heart_rate: h.map(f64::from),
            distance: Some(i as f64 * 0.01),
            speed: Some(10.0 + i as f64),
            ..Record::at(i as f64)
        })
        .collect()
}

fn series_set(name: String, hr: &[Option<u8>], mode: CoordinateMode) -> PerFileSeriesSet {
    let owned = records(hr);
    let refs: Vec<&Record> = owned.iter().collect();
    PerFileSeriesSet::build(name, "cycling", &refs, mode)
}

fn files() -> impl Strategy<Value = Vec<Vec<Option<u8>>>> {
    prop::collection::vec(prop::collection::vec(prop::option::of(60u8..200), 0..40), 1..5)
}

fn mode() -> impl Strategy<Value = CoordinateMode> {
    prop_oneof![Just(CoordinateMode::Time), Just(CoordinateMode::Distance)]
}

fn build_sets(files: &[Vec<Option<u8>>], mode: CoordinateMode) -> Vec<PerFileSeriesSet> {
    files
        .iter()
        .enumerate()
        .map(|(i, hr)| series_set(format!("{}.fit", i), hr, mode))
        .collect()
}

proptest! {
    #[test]
    fn every_series_matches_its_labels(files in files(), mode in mode()) {
        for set in build_sets(&files, mode) {
            for metric in Metric::ALL {
                prop_assert_eq!(set.series(metric).len(), set.labels.len());
            }
        }
    }

    #[test]
    fn reference_axis_is_longest(files in files(), mode in mode()) {
        let sets = build_sets(&files, mode);
        let longest = sets.iter().map(|s| s.labels.len()).max().unwrap_or(0);
        prop_assert_eq!(reference_axis(&sets).len(), longest);

        for overlay in aggregate_all(&sets) {
            prop_assert_eq!(overlay.labels.len(), longest);
            prop_assert_eq!(overlay.series.len(), sets.len());
            for (series, set) in overlay.series.iter().zip(&sets) {
                prop_assert_eq!(series.values.len(), set.labels.len());
            }
        }
    }

    #[test]
    fn aggregation_is_deterministic(files in files(), mode in mode()) {
        let sets = build_sets(&files, mode);
        let first = aggregate(&sets, Metric::HeartRate);
        let second = aggregate(&sets, Metric::HeartRate);

        prop_assert_eq!(&first.labels, &second.labels);
        for (a, b) in first.series.iter().zip(&second.series) {
            let a_bits: Vec<u64> = a.values.iter().map(|v| v.to_bits()).collect();
            let b_bits: Vec<u64> = b.values.iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(a_bits, b_bits);
        }
    }

    #[test]
    fn series_building_is_idempotent(hr in prop::collection::vec(prop::option::of(60u8..200), 0..60), mode in mode()) {
        let first = series_set("a.fit".to_string(), &hr, mode);
        let second = series_set("a.fit".to_string(), &hr, mode);

        prop_assert_eq!(&first.labels, &second.labels);
        for metric in Metric::ALL {
            let a: Vec<u64> = first.series(metric).iter().map(|v| v.to_bits()).collect();
            let b: Vec<u64> = second.series(metric).iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn suggested_bounds_come_from_first_file(files in files()) {
        let sets = build_sets(&files, CoordinateMode::Time);
        let overlay = aggregate(&sets, Metric::HeartRate);
        prop_assert_eq!(overlay.suggested_bounds, finite_bounds(sets[0].series(Metric::HeartRate)));
    }

    #[test]
    fn padding_keeps_values_and_fills_gaps(files in files()) {
        let sets = build_sets(&files, CoordinateMode::Time);
        let ragged = aggregate(&sets, Metric::HeartRate);
        let padded = ragged.clone().with_alignment(OverlayAlignment::PadWithGaps);

        for (r, p) in ragged.series.iter().zip(&padded.series) {
            prop_assert_eq!(p.values.len(), padded.labels.len());
            for (i, v) in p.values.iter().enumerate() {
                match r.values.get(i) {
                    Some(orig) => prop_assert_eq!(orig.to_bits(), v.to_bits()),
                    None => prop_assert!(v.is_nan()),
                }
            }
        }
    }

    #[test]
    fn time_labels_parse_back(seconds in 0u64..360_000) {
        prop_assert_eq!(parse_time(&format_time(seconds as f64)), Some(seconds));
    }
}
