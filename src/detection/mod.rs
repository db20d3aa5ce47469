//! Detection stages for vegetation-index series.
//!
//! This module provides tools for:
//! - Filtering samples that deviate too much from their predecessor
//! - Finding peaks and valleys of a smoothed series

mod extrema;
mod outlier;

pub use extrema::{
    detect_extrema, detect_extrema_values, find_peaks, local_maxima, peak_width, prominence,
    Extrema, ExtremaConfig, Extremum, ExtremumKind, UndefinedPolicy,
};
pub use outlier::{filter_deviations, percent_deviations, FilterConfig, FilteredSeries};
