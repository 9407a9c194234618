use crate::observation::Observation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single (date, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Errors raised when a series does not satisfy a transform's preconditions.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// The value at this date is NaN.
    MissingValue(NaiveDate),
    /// A period boundary could not be represented as a date.
    InvalidPeriod(NaiveDate),
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::MissingValue(date) => write!(f, "missing value at {}", date),
            SeriesError::InvalidPeriod(date) => {
                write!(f, "no period end can be derived for {}", date)
            }
        }
    }
}

impl std::error::Error for SeriesError {}

/// An ordered time series, ascending by date with unique dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries(pub Vec<DatedValue>);

impl TimeSeries {
    /// Build a series from (date, value) pairs. Values sharing a date are
    /// summed and the result is sorted by date.
    pub fn from_pairs<I>(pairs: I) -> TimeSeries
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (date, value) in pairs {
            *totals.entry(date).or_insert(0.0) += value;
        }
        TimeSeries(
            totals
                .into_iter()
                .map(|(date, value)| DatedValue { date, value })
                .collect(),
        )
    }

    /// Daily series of the given observations. Several stations reporting on
    /// the same day contribute to a single summed entry.
    pub fn from_observations(observations: &[Observation]) -> TimeSeries {
        TimeSeries::from_pairs(
            observations
                .iter()
                .map(|obs| (obs.date, obs.precipitation_mm)),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.0.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.value).collect()
    }

    /// First date whose value is NaN, if any.
    pub fn first_missing(&self) -> Option<NaiveDate> {
        self.0.iter().find(|p| p.value.is_nan()).map(|p| p.date)
    }

    /// Trailing rolling sum over `window` consecutive entries.
    ///
    /// The first `window - 1` entries have no complete window and are
    /// dropped, so the result has `len - (window - 1)` entries (or none).
    /// Each entry keeps the date of the last period in its window.
    pub fn rolling_sum(&self, window: usize) -> TimeSeries {
        if window == 0 || self.0.len() < window {
            return TimeSeries::default();
        }
        TimeSeries(
            self.0
                .windows(window)
                .map(|w| DatedValue {
                    date: w[window - 1].date,
                    value: w.iter().map(|p| p.value).sum(),
                })
                .collect(),
        )
    }
}
