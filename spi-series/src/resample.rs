//! Calendar resampling of daily series into period sums.

use crate::time_series::{SeriesError, TimeSeries};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use spi_utils::dates::{month_end, quarter_end, year_end};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Period granularity. Each period is labelled by its last calendar day.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Frequency {
    MonthEnd,
    QuarterEnd,
    YearEnd,
}

impl Frequency {
    /// Last day of the period that contains `date`.
    pub fn period_end(&self, date: &NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::MonthEnd => month_end(date.year(), date.month()),
            Frequency::QuarterEnd => quarter_end(date),
            Frequency::YearEnd => year_end(date),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::MonthEnd => "month",
            Frequency::QuarterEnd => "quarter",
            Frequency::YearEnd => "year",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" | "me" => Ok(Frequency::MonthEnd),
            "quarter" | "quarterly" | "qe" => Ok(Frequency::QuarterEnd),
            "year" | "yearly" | "ye" => Ok(Frequency::YearEnd),
            other => Err(format!("unknown frequency: {}", other)),
        }
    }
}

/// Sum a daily series within each calendar period.
///
/// The output is ascending by period end. Periods without any observation
/// are absent rather than zero. The input must be fully populated: a NaN
/// value yields [`SeriesError::MissingValue`].
pub fn resample(series: &TimeSeries, frequency: Frequency) -> Result<TimeSeries, SeriesError> {
    let mut periods: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in &series.0 {
        if point.value.is_nan() {
            return Err(SeriesError::MissingValue(point.date));
        }
        let end = frequency
            .period_end(&point.date)
            .ok_or(SeriesError::InvalidPeriod(point.date))?;
        *periods.entry(end).or_insert(0.0) += point.value;
    }
    Ok(TimeSeries::from_pairs(periods))
}
