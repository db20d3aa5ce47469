//! Signal transformations applied to filtered series.
//!
//! # Example
//!
//! ```
//! use biomass_cycles::transform::rolling_mean;
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! // Centered window of 3: the ends have no complete window
//! let rm = rolling_mean(&series, 3);
//! assert_eq!(rm[0], None);
//! assert_eq!(rm[2], Some(3.0));
//! ```

pub mod window;

pub use window::{rolling_mean, smooth, SmoothedSeries, SmoothingConfig};
