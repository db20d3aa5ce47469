//! Core data structures for vegetation-index series.

mod builder;
mod series;

pub use builder::{parse_scene_date, scene_mean, SeriesBuilder};
pub use series::{Observation, Series};
