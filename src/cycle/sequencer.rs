//! State machine turning peaks and valleys into alternating cycle events.
//!
//! The sequencer starts in [`SequencerState::Growth`] waiting for a peak and
//! walks the peak and valley indices with one cursor each:
//!
//! | State  | Condition                          | Emits         | Next   |
//! |--------|------------------------------------|---------------|--------|
//! | Growth | peak precedes the current valley   | `Cut`         | Peaked |
//! | Growth | otherwise (peak skipped)           | -             | Growth |
//! | Peaked | valley follows the last event      | `GrowthOrCut` | Growth |
//! | Peaked | otherwise (valley skipped)         | -             | Peaked |
//!
//! Each step advances the cursor of the kind it inspected. The walk stops as
//! soon as either cursor runs out, then one pending extremum matching the
//! final state is flushed.
//!
//! Peaks are labelled `Cut` and valleys `GrowthOrCut`, matching the labels
//! used in existing reports.

use crate::detection::{Extrema, FilteredSeries};
use crate::error::{CycleError, Result};
use chrono::NaiveDate;
use log::debug;
use std::fmt;

/// Label of a cycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleLabel {
    /// Attached to a peak.
    Cut,
    /// Attached to a valley.
    GrowthOrCut,
}

impl CycleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleLabel::Cut => "Cut",
            CycleLabel::GrowthOrCut => "GrowthOrCut",
        }
    }
}

impl fmt::Display for CycleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled marker on the filtered series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleEvent {
    /// Position in the filtered series.
    pub index: usize,
    pub date: NaiveDate,
    pub label: CycleLabel,
}

/// What the sequencer is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerState {
    /// Waiting for a peak.
    #[default]
    Growth,
    /// Waiting for a valley after a peak.
    Peaked,
}

/// Two-cursor walk over peak and valley indices.
#[derive(Debug, Clone)]
pub struct CycleSequencer<'a> {
    peaks: &'a [usize],
    valleys: &'a [usize],
    p: usize,
    v: usize,
    state: SequencerState,
    events: Vec<(usize, CycleLabel)>,
}

impl<'a> CycleSequencer<'a> {
    pub fn new(peaks: &'a [usize], valleys: &'a [usize]) -> Self {
        Self {
            peaks,
            valleys,
            p: 0,
            v: 0,
            state: SequencerState::Growth,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn events(&self) -> &[(usize, CycleLabel)] {
        &self.events
    }

    /// True while both cursors still point at an extremum.
    pub fn can_step(&self) -> bool {
        self.p < self.peaks.len() && self.v < self.valleys.len()
    }

    fn emit(&mut self, index: usize, label: CycleLabel) {
        self.events.push((index, label));
    }

    /// Apply one transition. Returns false when a cursor is exhausted.
    pub fn step(&mut self) -> bool {
        if !self.can_step() {
            return false;
        }

        match self.state {
            SequencerState::Growth => {
                let peak = self.peaks[self.p];
                if peak < self.valleys[self.v] {
                    self.emit(peak, CycleLabel::Cut);
                    self.state = SequencerState::Peaked;
                }
                self.p += 1;
            }
            SequencerState::Peaked => {
                let valley = self.valleys[self.v];
                let after_last = match self.events.last() {
                    Some(&(last, _)) => valley > last,
                    None => true,
                };
                if after_last {
                    self.emit(valley, CycleLabel::GrowthOrCut);
                    self.state = SequencerState::Growth;
                }
                self.v += 1;
            }
        }

        true
    }

    /// Run to completion, flush the pending extremum, and return the events.
    pub fn finish(mut self) -> Vec<(usize, CycleLabel)> {
        while self.step() {}

        if self.state == SequencerState::Growth && self.p < self.peaks.len() {
            let peak = self.peaks[self.p];
            self.emit(peak, CycleLabel::Cut);
        }
        if self.state == SequencerState::Peaked && self.v < self.valleys.len() {
            let valley = self.valleys[self.v];
            self.emit(valley, CycleLabel::GrowthOrCut);
        }

        self.events
    }
}

/// Sequence peak and valley indices into alternating `(index, label)` pairs.
pub fn sequence_labels(peaks: &[usize], valleys: &[usize]) -> Vec<(usize, CycleLabel)> {
    CycleSequencer::new(peaks, valleys).finish()
}

/// Sequence detected extrema into dated cycle events.
pub fn sequence_cycles(filtered: &FilteredSeries, extrema: &Extrema) -> Result<Vec<CycleEvent>> {
    let peaks = extrema.peak_indices();
    let valleys = extrema.valley_indices();

    let events = sequence_labels(&peaks, &valleys)
        .into_iter()
        .map(|(index, label)| {
            let date = filtered.date(index).ok_or_else(|| {
                CycleError::ContractViolation(format!(
                    "extremum index {} outside filtered series of length {}",
                    index,
                    filtered.len()
                ))
            })?;
            Ok(CycleEvent { index, date, label })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "sequenced {} events from {} peaks and {} valleys",
        events.len(),
        peaks.len(),
        valleys.len()
    );

    Ok(events)
}
