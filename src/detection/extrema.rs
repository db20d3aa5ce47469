//! Peak and valley detection on smoothed series.
//!
//! Candidates are strict local maxima (flat tops count once, at their middle
//! sample). A candidate is accepted when both its topographic prominence and
//! its width at `rel_height` of that prominence reach the configured minimums.
//! Valleys are the peaks of the negated signal.

use crate::error::{CycleError, Result};
use crate::transform::SmoothedSeries;
use log::debug;

/// How undefined smoothed values enter the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedPolicy {
    /// Treat undefined values as zero. Spurious extrema can appear next to
    /// the undefined edges.
    #[default]
    ZeroFill,
    /// Search only inside contiguous runs of defined values.
    Exclude,
}

/// Kind of extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtremumKind {
    Peak,
    Valley,
}

/// A detected extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    /// Position in the filtered series.
    pub index: usize,
    pub kind: ExtremumKind,
    /// Prominence measured on the searched signal (negated for valleys).
    pub prominence: f64,
    /// Interpolated width in samples.
    pub width: f64,
}

/// Configuration for extremum detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremaConfig {
    /// Minimum prominence.
    pub prominence_min: f64,
    /// Minimum width in samples.
    pub width_min: f64,
    /// Fraction of the prominence at which width is measured.
    pub rel_height: f64,
    pub undefined: UndefinedPolicy,
}

impl Default for ExtremaConfig {
    fn default() -> Self {
        Self {
            prominence_min: 0.05,
            width_min: 5.0,
            rel_height: 0.5,
            undefined: UndefinedPolicy::ZeroFill,
        }
    }
}

impl ExtremaConfig {
    /// Set the minimum prominence.
    pub fn prominence_min(mut self, prominence: f64) -> Self {
        self.prominence_min = prominence;
        self
    }

    /// Set the minimum width.
    pub fn width_min(mut self, width: f64) -> Self {
        self.width_min = width;
        self
    }

    /// Set the relative height for width measurement.
    pub fn rel_height(mut self, rel_height: f64) -> Self {
        self.rel_height = rel_height;
        self
    }

    /// Set the handling of undefined smoothed values.
    pub fn undefined(mut self, policy: UndefinedPolicy) -> Self {
        self.undefined = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.prominence_min >= 0.0) {
            return Err(CycleError::InvalidParameter(format!(
                "minimum prominence must be non-negative, got {}",
                self.prominence_min
            )));
        }
        if !(self.width_min >= 0.0) {
            return Err(CycleError::InvalidParameter(format!(
                "minimum width must be non-negative, got {}",
                self.width_min
            )));
        }
        if !(self.rel_height > 0.0) {
            return Err(CycleError::InvalidParameter(format!(
                "relative height must be positive, got {}",
                self.rel_height
            )));
        }
        Ok(())
    }
}

/// Peaks and valleys found in one series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extrema {
    pub peaks: Vec<Extremum>,
    pub valleys: Vec<Extremum>,
}

impl Extrema {
    pub fn peak_indices(&self) -> Vec<usize> {
        self.peaks.iter().map(|e| e.index).collect()
    }

    pub fn valley_indices(&self) -> Vec<usize> {
        self.valleys.iter().map(|e| e.index).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty() && self.valleys.is_empty()
    }

    /// All extrema ordered by index.
    pub fn merged(&self) -> Vec<Extremum> {
        let mut all: Vec<Extremum> = self.peaks.iter().chain(&self.valleys).copied().collect();
        all.sort_by_key(|e| e.index);
        all
    }
}

/// Indices of strict local maxima; a flat top yields its middle sample.
///
/// The first and last samples are never maxima.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let n = x.len();
    let mut maxima = Vec::new();
    if n < 3 {
        return maxima;
    }

    let i_max = n - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    maxima
}

/// Prominence of a peak together with its left and right bases.
///
/// Each side is scanned until a strictly higher sample or the series end;
/// the base is the lowest sample on that stretch.
pub fn prominence(x: &[f64], peak: usize) -> (f64, usize, usize) {
    let height = x[peak];

    let mut left_base = peak;
    let mut left_min = height;
    let mut i = peak;
    loop {
        if x[i] > height {
            break;
        }
        if x[i] < left_min {
            left_min = x[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_base = peak;
    let mut right_min = height;
    let mut i = peak;
    while i < x.len() && x[i] <= height {
        if x[i] < right_min {
            right_min = x[i];
            right_base = i;
        }
        i += 1;
    }

    (height - left_min.max(right_min), left_base, right_base)
}

/// Width of a peak at `rel_height` of its prominence, linearly interpolated
/// between samples and bounded by the bases.
pub fn peak_width(
    x: &[f64],
    peak: usize,
    prominence: f64,
    left_base: usize,
    right_base: usize,
    rel_height: f64,
) -> f64 {
    let height = x[peak] - prominence * rel_height;

    let mut i = peak;
    while left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if x[i] < height {
        left_ip += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < right_base && height < x[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if x[i] < height {
        right_ip -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    right_ip - left_ip
}

/// Find peaks of `x` meeting the prominence and width minimums.
pub fn find_peaks(x: &[f64], config: &ExtremaConfig, kind: ExtremumKind) -> Vec<Extremum> {
    local_maxima(x)
        .into_iter()
        .filter_map(|peak| {
            let (prom, left_base, right_base) = prominence(x, peak);
            if prom < config.prominence_min {
                return None;
            }
            let width = peak_width(x, peak, prom, left_base, right_base, config.rel_height);
            if width < config.width_min {
                return None;
            }
            Some(Extremum {
                index: peak,
                kind,
                prominence: prom,
                width,
            })
        })
        .collect()
}

/// Contiguous runs of defined values as `(start, end)` half-open ranges.
fn defined_runs(values: &[Option<f64>]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, v) in values.iter().enumerate() {
        match (v.is_some(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, values.len()));
    }

    runs
}

fn search(signal: &[f64], config: &ExtremaConfig, kind: ExtremumKind) -> Vec<Extremum> {
    match kind {
        ExtremumKind::Peak => find_peaks(signal, config, kind),
        ExtremumKind::Valley => {
            let negated: Vec<f64> = signal.iter().map(|v| -v).collect();
            find_peaks(&negated, config, kind)
        }
    }
}

/// Detect peaks and valleys of raw values with undefined positions.
pub fn detect_extrema_values(values: &[Option<f64>], config: &ExtremaConfig) -> Result<Extrema> {
    config.validate()?;

    let extrema = match config.undefined {
        UndefinedPolicy::ZeroFill => {
            let signal: Vec<f64> = values.iter().map(|v| v.unwrap_or(0.0)).collect();
            Extrema {
                peaks: search(&signal, config, ExtremumKind::Peak),
                valleys: search(&signal, config, ExtremumKind::Valley),
            }
        }
        UndefinedPolicy::Exclude => {
            let mut extrema = Extrema::default();
            for (start, end) in defined_runs(values) {
                let signal: Vec<f64> = values[start..end].iter().flatten().copied().collect();
                let shift = |mut e: Extremum| {
                    e.index += start;
                    e
                };
                extrema
                    .peaks
                    .extend(search(&signal, config, ExtremumKind::Peak).into_iter().map(shift));
                extrema
                    .valleys
                    .extend(search(&signal, config, ExtremumKind::Valley).into_iter().map(shift));
            }
            extrema
        }
    };

    debug!(
        "found {} peaks and {} valleys in {} samples",
        extrema.peaks.len(),
        extrema.valleys.len(),
        values.len()
    );

    Ok(extrema)
}

/// Detect peaks and valleys of a smoothed series.
pub fn detect_extrema(smoothed: &SmoothedSeries, config: &ExtremaConfig) -> Result<Extrema> {
    detect_extrema_values(smoothed.smoothed(), config)
}
