//! Property-based tests for the cycle detection stages.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated vegetation-index series.

use biomass_cycles::core::Series;
use biomass_cycles::cycle::{sequence_labels, CycleLabel};
use biomass_cycles::detection::{
    detect_extrema_values, filter_deviations, ExtremaConfig, FilterConfig, UndefinedPolicy,
};
use biomass_cycles::export::{write_events, write_filtered_table, write_full_table};
use biomass_cycles::pipeline::{run_pipeline, PipelineConfig};
use biomass_cycles::transform::{smooth, SmoothingConfig};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

/// Create a Series from a vector of values, one sample every five days.
fn make_series(values: &[f64]) -> Series {
    let base = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let dates = (0..values.len())
        .map(|i| base + Duration::days(5 * i as i64))
        .collect();
    Series::from_parts(dates, values.to_vec()).unwrap()
}

/// Strategy for NDVI-like values, including occasional spikes.
fn ndvi_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            8 => 0.05..0.95_f64,
            1 => 1.0..5.0_f64,
        ],
        min_len..max_len,
    )
}

/// Strategy for seasonal series with noise.
fn seasonal_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            10.0..60.0_f64,
            0.1..0.3_f64,
            prop::collection::vec(-0.02..0.02_f64, len),
        )
            .prop_map(move |(period, amplitude, noise)| {
                (0..len)
                    .map(|i| {
                        0.5 + amplitude * (2.0 * std::f64::consts::PI * i as f64 / period).sin()
                            + noise[i]
                    })
                    .collect()
            })
    })
}

/// Strictly increasing, sparse index sequence.
fn index_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::btree_set(0usize..200, 0..12).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn filter_checks_original_predecessor(
        values in ndvi_values_strategy(1, 80),
        threshold in 0.0..200.0_f64
    ) {
        let series = make_series(&values);
        let filtered = filter_deviations(&series, &FilterConfig::default().threshold(threshold)).unwrap();

        prop_assert_eq!(filtered.source_indices()[0], 0);
        for &i in filtered.source_indices().iter().skip(1) {
            let deviation = (values[i] - values[i - 1]).abs() / values[i - 1] * 100.0;
            prop_assert!(deviation <= threshold);
        }
        for i in filtered.dropped_indices() {
            let deviation = (values[i] - values[i - 1]).abs() / values[i - 1] * 100.0;
            prop_assert!(deviation > threshold);
        }
    }

    #[test]
    fn smoother_preserves_length_and_edges(
        values in ndvi_values_strategy(1, 80),
        half in 0usize..6
    ) {
        let window = 2 * half + 1;
        let series = make_series(&values);
        let filtered = filter_deviations(&series, &FilterConfig::default()).unwrap();
        let smoothed = smooth(&filtered, &SmoothingConfig::default().window(window)).unwrap();

        let n = filtered.len();
        prop_assert_eq!(smoothed.len(), n);
        for (i, v) in smoothed.smoothed().iter().enumerate() {
            let complete = i >= half && i + half < n;
            prop_assert_eq!(v.is_some(), complete);
        }
    }

    #[test]
    fn extrema_are_increasing_and_disjoint(
        values in seasonal_values_strategy(10, 150),
        exclude in any::<bool>()
    ) {
        let series = make_series(&values);
        let filtered = filter_deviations(&series, &FilterConfig::default()).unwrap();
        let smoothed = smooth(&filtered, &SmoothingConfig::default()).unwrap();
        let policy = if exclude { UndefinedPolicy::Exclude } else { UndefinedPolicy::ZeroFill };
        let config = ExtremaConfig::default().prominence_min(0.0).width_min(0.0).undefined(policy);

        let extrema = detect_extrema_values(smoothed.smoothed(), &config).unwrap();
        let peaks = extrema.peak_indices();
        let valleys = extrema.valley_indices();

        prop_assert!(peaks.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(valleys.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(peaks.iter().all(|p| !valleys.contains(p)));
        prop_assert!(peaks.iter().chain(&valleys).all(|&i| i < smoothed.len()));
    }

    #[test]
    fn sequencer_alternates_starting_with_cut(
        peaks in index_strategy(),
        valleys in index_strategy()
    ) {
        // Peaks and valleys never share an index.
        let valleys: Vec<usize> = valleys.into_iter().filter(|v| !peaks.contains(v)).collect();

        let events = sequence_labels(&peaks, &valleys);

        if let Some(first) = events.first() {
            prop_assert_eq!(first.1, CycleLabel::Cut);
        }
        for pair in events.windows(2) {
            prop_assert_ne!(pair[0].1, pair[1].1);
        }
        for (index, label) in &events {
            match label {
                CycleLabel::Cut => prop_assert!(peaks.contains(index)),
                CycleLabel::GrowthOrCut => prop_assert!(valleys.contains(index)),
            }
        }
    }

    #[test]
    fn pipeline_is_deterministic(values in seasonal_values_strategy(10, 120)) {
        let series = make_series(&values);
        let config = PipelineConfig::default();

        let render = || {
            let result = run_pipeline(&series, &config).unwrap();
            let mut out = Vec::new();
            write_full_table(&mut out, result.series()).unwrap();
            write_filtered_table(&mut out, result.smoothed()).unwrap();
            write_events(&mut out, result.events()).unwrap();
            out
        };

        prop_assert_eq!(render(), render());
    }
}
