//! Integration tests: scene ingestion through CSV report.

use biomass_cycles::cycle::{sequence_labels, CycleLabel};
use biomass_cycles::export::{
    export_report, render_chart, CYCLE_CHART_FILE, CYCLE_EVENTS_FILE, FULL_SERIES_FILE,
};
use biomass_cycles::prelude::*;
use chrono::{Duration, NaiveDate};
use std::fs;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Two and a half growing seasons, sampled every five days, with a few
/// cloud-contaminated scenes.
fn field_series() -> Series {
    let mut builder = SeriesBuilder::new();
    for i in 0..110 {
        let date = start() + Duration::days(5 * i);
        let phase = 2.0 * std::f64::consts::PI * i as f64 / 44.0;
        let mut value = 0.45 + 0.3 * phase.sin();
        if i % 37 == 12 {
            value *= 3.0;
        }
        builder = builder.observation(date, value);
    }
    builder.build().unwrap()
}

#[test]
fn scenario_alternating_indices() {
    let events = sequence_labels(&[5, 15], &[10, 20]);

    assert_eq!(
        events,
        vec![
            (5, CycleLabel::Cut),
            (10, CycleLabel::GrowthOrCut),
            (15, CycleLabel::Cut),
            (20, CycleLabel::GrowthOrCut),
        ]
    );
}

#[test]
fn scenario_empty_series() {
    let series = SeriesBuilder::new().build().unwrap();

    let result = run_pipeline(&series, &PipelineConfig::default());

    assert_eq!(result.unwrap_err(), CycleError::EmptySeries);
}

#[test]
fn scenario_large_jump_is_dropped() {
    let series = SeriesBuilder::new()
        .observation(start(), 10.0)
        .observation(start() + Duration::days(5), 25.0)
        .build()
        .unwrap();

    let result = run_pipeline(&series, &PipelineConfig::default().threshold(100.0)).unwrap();

    assert_eq!(result.filtered().values(), vec![10.0]);
    assert_eq!(result.full_table().len(), 2);
}

#[test]
fn unsorted_input_is_a_contract_violation() {
    let result = Series::new(vec![
        Observation::new(start() + Duration::days(10), 0.3),
        Observation::new(start(), 0.4),
    ]);

    assert!(matches!(result, Err(CycleError::ContractViolation(_))));
}

#[test]
fn field_season_detects_cycles() {
    let series = field_series();

    let result = run_pipeline(&series, &PipelineConfig::default()).unwrap();

    // Spikes at 12, 49 and 86 are removed.
    assert_eq!(result.filtered().dropped_indices(), vec![12, 49, 86]);

    let events = result.events();
    assert!(events.len() >= 3);
    assert_eq!(events[0].label, CycleLabel::Cut);
    for pair in events.windows(2) {
        assert_ne!(pair[0].label, pair[1].label);
        assert!(pair[0].date < pair[1].date);
    }
    for event in events {
        assert_eq!(result.filtered().date(event.index), Some(event.date));
    }
}

#[test]
fn exclude_mode_ignores_edges() {
    let series = field_series();
    let config = PipelineConfig::default().undefined(UndefinedPolicy::Exclude);

    let result = run_pipeline(&series, &config).unwrap();
    let half = config.smoothing.half_width();
    let len = result.filtered().len();

    for extremum in result.extrema().merged() {
        assert!(extremum.index >= half && extremum.index < len - half);
    }
}

#[test]
fn scenes_feed_the_pipeline() {
    let mut builder = SeriesBuilder::new();
    for i in (0..60).rev() {
        let date = start() + Duration::days(6 * i);
        let ndvi = 0.5 + 0.25 * (2.0 * std::f64::consts::PI * i as f64 / 30.0).cos();
        let pixels = vec![ndvi * 10_000.0; 16];
        builder = builder.scene(&format!("biomass_{}Z.tif", date.format("%Y-%m-%d")), &pixels);
    }
    builder = builder.scene("biomass_notes.txt", &[0.1]);
    assert_eq!(builder.skipped().len(), 1);

    let series = builder.build().unwrap();
    assert_eq!(series.len(), 60);
    assert!((series.values()[0] - 0.75).abs() < 1e-9);

    let result = run_pipeline(&series, &PipelineConfig::default()).unwrap();
    assert_eq!(result.filtered().len(), 60);
}

#[test]
fn report_is_written_and_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let series = field_series();
    let result = run_pipeline(&series, &PipelineConfig::default()).unwrap();

    let paths = export_report(dir.path(), &result).unwrap();
    assert_eq!(paths.full_series, dir.path().join(FULL_SERIES_FILE));

    let full = fs::read_to_string(&paths.full_series).unwrap();
    assert_eq!(full.lines().count(), series.len() + 1);
    assert!(full.starts_with("Date,Value\n2020-01-01,"));

    let filtered = fs::read_to_string(&paths.filtered_series).unwrap();
    assert_eq!(filtered.lines().count(), result.filtered().len() + 1);
    assert!(filtered.starts_with("Date,Value,SmoothedValue\n"));

    let events = fs::read_to_string(dir.path().join(CYCLE_EVENTS_FILE)).unwrap();
    assert_eq!(events.lines().count(), result.events().len() + 1);
    assert!(events.lines().nth(1).unwrap().ends_with(",Cut"));

    let again = run_pipeline(&series, &PipelineConfig::default()).unwrap();
    let second = tempfile::tempdir().unwrap();
    let paths2 = export_report(second.path(), &again).unwrap();
    assert_eq!(fs::read(&paths.filtered_series).unwrap(), fs::read(&paths2.filtered_series).unwrap());
    assert_eq!(fs::read(&paths.cycle_events).unwrap(), fs::read(&paths2.cycle_events).unwrap());
}

#[test]
fn report_includes_cycle_chart() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_pipeline(&field_series(), &PipelineConfig::default()).unwrap();

    let paths = export_report(dir.path(), &result).unwrap();

    assert_eq!(paths.cycle_chart, dir.path().join(CYCLE_CHART_FILE));
    let svg = fs::read_to_string(&paths.cycle_chart).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Original biomass"));
    assert!(svg.contains("Smoothed biomass"));
    assert_eq!(svg, render_chart(&result).unwrap());
}
