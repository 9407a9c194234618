//! Cleaning of raw precipitation records before resampling.
//!
//! Every step returns a new vector; inputs are left untouched.

use crate::observation::Observation;
use chrono::{Datelike, NaiveDate};
use log::info;
use std::collections::{HashMap, HashSet};

/// Drop repeated (station, date) records, keeping the first occurrence.
pub fn deduplicate(observations: &[Observation]) -> Vec<Observation> {
    let mut seen: HashSet<(Option<&str>, NaiveDate)> = HashSet::new();
    observations
        .iter()
        .filter(|obs| seen.insert((obs.station_id.as_deref(), obs.date)))
        .cloned()
        .collect()
}

/// Replace missing values with the mean of all non-missing values reported
/// in the same calendar year and month.
///
/// Months without a single valid value stay missing.
pub fn fill_missing(observations: &[Observation]) -> Vec<Observation> {
    let mut sums: HashMap<(i32, u32), (f64, u32)> = HashMap::new();
    for obs in observations.iter().filter(|obs| !obs.is_missing()) {
        let entry = sums.entry((obs.date.year(), obs.date.month())).or_insert((0.0, 0));
        entry.0 += obs.precipitation_mm;
        entry.1 += 1;
    }
    observations
        .iter()
        .map(|obs| {
            if !obs.is_missing() {
                return obs.clone();
            }
            let mean = sums
                .get(&(obs.date.year(), obs.date.month()))
                .map(|(sum, count)| sum / *count as f64)
                .unwrap_or(f64::NAN);
            Observation {
                precipitation_mm: mean,
                ..obs.clone()
            }
        })
        .collect()
}

/// Remove records whose value is still missing.
pub fn drop_missing(observations: &[Observation]) -> Vec<Observation> {
    observations
        .iter()
        .filter(|obs| !obs.is_missing())
        .cloned()
        .collect()
}

/// Run deduplication, gap filling and removal of unfillable gaps.
pub fn preprocess(observations: &[Observation]) -> Vec<Observation> {
    let deduplicated = deduplicate(observations);
    let duplicates = observations.len() - deduplicated.len();
    let missing_before = deduplicated.iter().filter(|o| o.is_missing()).count();
    let filled = fill_missing(&deduplicated);
    let cleaned = drop_missing(&filled);
    info!(
        "Preprocessing: {} duplicates dropped, {} missing values, {} left unfilled",
        duplicates,
        missing_before,
        filled.len() - cleaned.len()
    );
    cleaned
}
