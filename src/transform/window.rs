//! Rolling window smoothing.
//!
//! Windows must be complete: a position whose window would reach past either
//! end of the series, or that covers a NaN, has no value.

use crate::detection::FilteredSeries;
use crate::error::{CycleError, Result};
use chrono::NaiveDate;
use log::debug;

/// Configuration for the moving-average smoother.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingConfig {
    /// Window size in samples. Must be odd so the window has a center.
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window: 9 }
    }
}

impl SmoothingConfig {
    /// Set the window size.
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(CycleError::InvalidParameter(
                "smoothing window must be positive".to_string(),
            ));
        }
        if self.window % 2 == 0 {
            return Err(CycleError::InvalidParameter(format!(
                "smoothing window must be odd, got {}",
                self.window
            )));
        }
        Ok(())
    }

    /// Number of undefined positions at each end of a smoothed series.
    pub fn half_width(&self) -> usize {
        self.window / 2
    }
}

/// Compute a centered rolling mean over complete windows.
///
/// # Arguments
/// * `series` - Input values
/// * `window` - Window size; each mean lands on position `start + window / 2`
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let mut result = vec![None; n];
    if window == 0 || window > n {
        return result;
    }

    let offset = window / 2;

    for start in 0..=(n - window) {
        let segment = &series[start..start + window];
        if segment.iter().any(|x| x.is_nan()) {
            continue;
        }
        result[start + offset] = Some(segment.iter().sum::<f64>() / window as f64);
    }

    result
}

/// Smoothed values aligned with a [`FilteredSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    filtered: FilteredSeries,
    smoothed: Vec<Option<f64>>,
    window: usize,
}

impl SmoothedSeries {
    pub fn len(&self) -> usize {
        self.smoothed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smoothed.is_empty()
    }

    /// The filtered series the values are aligned with.
    pub fn filtered(&self) -> &FilteredSeries {
        &self.filtered
    }

    /// Smoothed value per position, `None` where undefined.
    pub fn smoothed(&self) -> &[Option<f64>] {
        &self.smoothed
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn defined_count(&self) -> usize {
        self.smoothed.iter().filter(|v| v.is_some()).count()
    }

    /// Smoothed values with undefined positions replaced by `fill`.
    pub fn filled(&self, fill: f64) -> Vec<f64> {
        self.smoothed.iter().map(|v| v.unwrap_or(fill)).collect()
    }

    /// Rows of `(date, value, smoothed value)`.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64, Option<f64>)> + '_ {
        self.filtered
            .observations()
            .iter()
            .zip(&self.smoothed)
            .map(|(obs, smoothed)| (obs.date(), obs.value(), *smoothed))
    }
}

/// Smooth a filtered series with a centered moving average.
pub fn smooth(filtered: &FilteredSeries, config: &SmoothingConfig) -> Result<SmoothedSeries> {
    config.validate()?;

    let smoothed = rolling_mean(&filtered.values(), config.window);

    debug!(
        "smoothed {} samples with window {} ({} defined)",
        smoothed.len(),
        config.window,
        smoothed.iter().filter(|v| v.is_some()).count()
    );

    Ok(SmoothedSeries {
        filtered: filtered.clone(),
        smoothed,
        window: config.window,
    })
}
