//! # biomass-cycles
//!
//! Crop cycle detection over vegetation-index time series.
//!
//! A series of per-scene NDVI averages is cleaned of abrupt deviations,
//! smoothed with a centered moving average, searched for prominent peaks
//! and valleys, and turned into an alternating sequence of `Cut` and
//! `GrowthOrCut` events. The stages are pure functions; [`pipeline`] chains
//! them and [`export`] writes the resulting tables as CSV.

#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod core;
pub mod cycle;
pub mod detection;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod transform;

pub use error::{CycleError, Result};

pub mod prelude {
    pub use crate::core::{Observation, Series, SeriesBuilder};
    pub use crate::cycle::{CycleEvent, CycleLabel};
    pub use crate::detection::{ExtremaConfig, FilterConfig, UndefinedPolicy};
    pub use crate::error::{CycleError, Result};
    pub use crate::pipeline::{run_pipeline, PipelineConfig, PipelineResult};
    pub use crate::transform::SmoothingConfig;
}
