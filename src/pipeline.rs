//! End-to-end cycle detection: filter, smooth, detect extrema, sequence.
//!
//! # Example
//!
//! ```
//! use biomass_cycles::core::Series;
//! use biomass_cycles::pipeline::{run_pipeline, PipelineConfig};
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let dates = (0..120).map(|i| start + Duration::days(5 * i)).collect();
//! let values = (0..120)
//!     .map(|i| 0.5 + 0.25 * (2.0 * std::f64::consts::PI * i as f64 / 40.0).sin())
//!     .collect();
//! let series = Series::from_parts(dates, values).unwrap();
//!
//! let result = run_pipeline(&series, &PipelineConfig::default()).unwrap();
//!
//! assert_eq!(result.full_table().len(), 120);
//! assert!(!result.events().is_empty());
//! ```

use crate::core::Series;
use crate::cycle::{sequence_cycles, CycleEvent, CycleLabel};
use crate::detection::{
    detect_extrema, filter_deviations, Extrema, ExtremaConfig, FilterConfig, FilteredSeries,
    UndefinedPolicy,
};
use crate::error::Result;
use crate::transform::{smooth, SmoothedSeries, SmoothingConfig};
use chrono::NaiveDate;
use log::info;

/// Parameters for every stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub smoothing: SmoothingConfig,
    pub extrema: ExtremaConfig,
}

impl PipelineConfig {
    /// Set the percent deviation threshold of the outlier filter.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.filter.threshold = threshold;
        self
    }

    /// Set the smoothing window.
    pub fn window(mut self, window: usize) -> Self {
        self.smoothing.window = window;
        self
    }

    /// Set the minimum extremum prominence.
    pub fn prominence_min(mut self, prominence: f64) -> Self {
        self.extrema.prominence_min = prominence;
        self
    }

    /// Set the minimum extremum width in samples.
    pub fn width_min(mut self, width: f64) -> Self {
        self.extrema.width_min = width;
        self
    }

    /// Set how undefined smoothed values enter extremum detection.
    pub fn undefined(mut self, policy: UndefinedPolicy) -> Self {
        self.extrema.undefined = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.smoothing.validate()?;
        self.extrema.validate()
    }
}

/// Every product of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    series: Series,
    smoothed: SmoothedSeries,
    extrema: Extrema,
    events: Vec<CycleEvent>,
}

impl PipelineResult {
    /// The unfiltered input.
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn filtered(&self) -> &FilteredSeries {
        self.smoothed.filtered()
    }

    pub fn smoothed(&self) -> &SmoothedSeries {
        &self.smoothed
    }

    pub fn extrema(&self) -> &Extrema {
        &self.extrema
    }

    pub fn events(&self) -> &[CycleEvent] {
        &self.events
    }

    /// `(Date, Value)` for every original observation.
    pub fn full_table(&self) -> Vec<(NaiveDate, f64)> {
        self.series.iter().map(|o| (o.date(), o.value())).collect()
    }

    /// `(Date, Value, SmoothedValue)` for every retained observation.
    pub fn filtered_table(&self) -> Vec<(NaiveDate, f64, Option<f64>)> {
        self.smoothed.rows().collect()
    }

    /// `(Date, Label)` for every cycle event.
    pub fn event_table(&self) -> Vec<(NaiveDate, CycleLabel)> {
        self.events.iter().map(|e| (e.date, e.label)).collect()
    }
}

/// Run all stages over a date-ordered series.
///
/// Fails fast on the first stage error; no partial result is returned.
pub fn run_pipeline(series: &Series, config: &PipelineConfig) -> Result<PipelineResult> {
    config.validate()?;

    let filtered = filter_deviations(series, &config.filter)?;

    let smoothed = smooth(&filtered, &config.smoothing)?;
    let extrema = detect_extrema(&smoothed, &config.extrema)?;
    let events = sequence_cycles(&filtered, &extrema)?;

    info!(
        "cycle detection: {} observations, {} retained, {} peaks, {} valleys, {} events",
        series.len(),
        filtered.len(),
        extrema.peaks.len(),
        extrema.valleys.len(),
        events.len()
    );

    Ok(PipelineResult {
        series: series.clone(),
        smoothed,
        extrema,
        events,
    })
}
