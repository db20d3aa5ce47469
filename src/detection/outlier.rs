//! Deviation-based outlier filtering.
//!
//! A sample is dropped when its percent change relative to the sample that
//! precedes it in the *original* series exceeds a threshold. Filtering is a
//! single pass: a dropped sample still serves as the reference for its
//! successor.

use crate::core::{Observation, Series};
use crate::error::{CycleError, Result};
use chrono::NaiveDate;
use log::debug;

/// Configuration for the deviation filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Maximum accepted percent deviation from the previous sample.
    pub threshold: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { threshold: 100.0 }
    }
}

impl FilterConfig {
    /// Set the percent deviation threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold >= 0.0) {
            return Err(CycleError::InvalidParameter(format!(
                "deviation threshold must be non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Percent change of every sample relative to its original predecessor.
///
/// Position 0 has no predecessor and yields `None`. A zero predecessor
/// gives a non-finite deviation.
pub fn percent_deviations(values: &[f64]) -> Vec<Option<f64>> {
    let mut deviations = Vec::with_capacity(values.len());
    if values.is_empty() {
        return deviations;
    }

    deviations.push(None);
    for pair in values.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        deviations.push(Some((curr - prev).abs() / prev * 100.0));
    }

    deviations
}

/// Observations that survived the deviation filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSeries {
    observations: Vec<Observation>,
    /// Position of each retained observation in the original series.
    source_indices: Vec<usize>,
    /// Deviation of every original sample (`None` for the first).
    deviations: Vec<Option<f64>>,
    threshold: f64,
}

impl FilteredSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value()).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date()).collect()
    }

    /// Date of the retained observation at `index`.
    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.observations.get(index).map(|o| o.date())
    }

    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    /// Percent deviations of the original series, one per original sample.
    pub fn deviations(&self) -> &[Option<f64>] {
        &self.deviations
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Original indices that were removed.
    pub fn dropped_indices(&self) -> Vec<usize> {
        let mut retained = self.source_indices.iter().peekable();
        (0..self.deviations.len())
            .filter(|i| {
                if retained.peek() == Some(&i) {
                    retained.next();
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    pub fn dropped_count(&self) -> usize {
        self.deviations.len() - self.observations.len()
    }
}

/// Remove samples that deviate too much from their original predecessor.
///
/// The first observation is always retained. Samples with a non-finite
/// deviation (zero or NaN predecessor) are dropped.
pub fn filter_deviations(series: &Series, config: &FilterConfig) -> Result<FilteredSeries> {
    config.validate()?;
    if series.is_empty() {
        return Err(CycleError::EmptySeries);
    }

    let deviations = percent_deviations(&series.values());

    let (source_indices, observations): (Vec<usize>, Vec<Observation>) = series
        .iter()
        .zip(&deviations)
        .enumerate()
        .filter(|(_, (_, deviation))| match deviation {
            None => true,
            Some(d) => *d <= config.threshold,
        })
        .map(|(i, (obs, _))| (i, *obs))
        .unzip();

    debug!(
        "deviation filter kept {} of {} observations (threshold {}%)",
        observations.len(),
        series.len(),
        config.threshold
    );

    Ok(FilteredSeries {
        observations,
        source_indices,
        deviations,
        threshold: config.threshold,
    })
}
