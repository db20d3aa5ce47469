//! Date-ordered series of per-scene vegetation-index values.

use crate::error::{CycleError, Result};
use chrono::NaiveDate;

/// A single dated sample, one per satellite pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    date: NaiveDate,
    value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Observations in strictly ascending date order.
///
/// The ordering is a precondition: [`Series::new`] rejects unsorted or
/// duplicated dates instead of sorting them. Use
/// [`SeriesBuilder`](crate::core::SeriesBuilder) when the input still needs
/// to be ordered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Create a series, checking that dates are strictly increasing.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for (i, pair) in observations.windows(2).enumerate() {
            if pair[1].date == pair[0].date {
                return Err(CycleError::ContractViolation(format!(
                    "duplicate date {} at position {}",
                    pair[1].date,
                    i + 1
                )));
            }
            if pair[1].date < pair[0].date {
                return Err(CycleError::ContractViolation(format!(
                    "dates must be strictly increasing: {} follows {} at position {}",
                    pair[1].date,
                    pair[0].date,
                    i + 1
                )));
            }
        }

        Ok(Self { observations })
    }

    /// Create a series from parallel date and value vectors.
    pub fn from_parts(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(CycleError::ContractViolation(format!(
                "got {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(values)
                .map(|(date, value)| Observation::new(date, value))
                .collect(),
        )
    }

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

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// First and last date, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
