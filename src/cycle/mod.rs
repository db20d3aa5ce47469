//! Crop cycle reconstruction from detected extrema.
//!
//! # Example
//!
//! ```
//! use biomass_cycles::cycle::{sequence_labels, CycleLabel};
//!
//! let events = sequence_labels(&[5, 15], &[10, 20]);
//!
//! assert_eq!(
//!     events,
//!     vec![
//!         (5, CycleLabel::Cut),
//!         (10, CycleLabel::GrowthOrCut),
//!         (15, CycleLabel::Cut),
//!         (20, CycleLabel::GrowthOrCut),
//!     ]
//! );
//! ```

mod sequencer;

pub use sequencer::{
    sequence_cycles, sequence_labels, CycleEvent, CycleLabel, CycleSequencer, SequencerState,
};
