//! Assembling a [`Series`] from scene rasters or loose observations.

use super::series::{Observation, Series};
use crate::error::{CycleError, Result};
use chrono::NaiveDate;
use log::{debug, warn};
use std::path::Path;

/// Integer-scaled products store NDVI multiplied by this factor.
const NDVI_SCALE: f64 = 10_000.0;

/// Parse the acquisition date out of a scene file name.
///
/// The date is the second `_`-separated token with the `Z.tif` suffix
/// removed, e.g. `biomass_2023-05-14Z.tif`. Directory components are ignored.
pub fn parse_scene_date(file_name: &str) -> Result<NaiveDate> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);

    let token = base
        .split('_')
        .nth(1)
        .ok_or_else(|| CycleError::InvalidSceneName(file_name.to_string()))?;

    NaiveDate::parse_from_str(&token.replace("Z.tif", ""), "%Y-%m-%d")
        .map_err(|_| CycleError::InvalidSceneName(file_name.to_string()))
}

/// Mean of the finite pixels of a scene.
///
/// When any finite pixel exceeds 1 the raster is taken to be integer-scaled
/// and every pixel is divided by 10000 first. Returns `None` when the scene
/// has no finite pixel.
pub fn scene_mean(pixels: &[f64]) -> Option<f64> {
    let finite = || pixels.iter().copied().filter(|p| p.is_finite());

    let max = finite().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return None;
    }

    let scale = if max > 1.0 { NDVI_SCALE } else { 1.0 };
    let (sum, count) = finite().fold((0.0, 0usize), |(s, c), p| (s + p / scale, c + 1));

    Some(sum / count as f64)
}

/// Builder that collects observations in any order and sorts them.
#[derive(Debug, Clone, Default)]
pub struct SeriesBuilder {
    observations: Vec<Observation>,
    skipped: Vec<String>,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-reduced observation.
    pub fn observation(mut self, date: NaiveDate, value: f64) -> Self {
        self.observations.push(Observation::new(date, value));
        self
    }

    /// Add many already-reduced observations.
    pub fn observations<I>(mut self, observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        self.observations.extend(
            observations
                .into_iter()
                .map(|(date, value)| Observation::new(date, value)),
        );
        self
    }

    /// Add a scene raster, reducing it to its mean value.
    ///
    /// Scenes whose name carries no date, or that have no finite pixel, are
    /// skipped and remembered in [`skipped`](Self::skipped).
    pub fn scene(mut self, file_name: &str, pixels: &[f64]) -> Self {
        let date = match parse_scene_date(file_name) {
            Ok(date) => date,
            Err(err) => {
                warn!("skipping scene: {}", err);
                self.skipped.push(file_name.to_string());
                return self;
            }
        };

        match scene_mean(pixels) {
            Some(value) => self.observations.push(Observation::new(date, value)),
            None => {
                warn!("skipping scene {}: no valid pixels", file_name);
                self.skipped.push(file_name.to_string());
            }
        }
        self
    }

    /// Names of scenes that could not be used.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Sort by date and build the series. Duplicate dates are rejected.
    pub fn build(mut self) -> Result<Series> {
        self.observations.sort_by_key(|o| o.date());
        debug!(
            "built series of {} observations ({} scenes skipped)",
            self.observations.len(),
            self.skipped.len()
        );
        Series::new(self.observations)
    }
}
