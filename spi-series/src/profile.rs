//! Per-column completeness of a set of observations.

use crate::observation::Observation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Non-missing, distinct and missing value counts of one input column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub missing: usize,
}

impl ColumnProfile {
    fn from_keys<K, I>(column: &str, total: usize, keys: I) -> Self
    where
        K: std::hash::Hash + Eq,
        I: IntoIterator<Item = Option<K>>,
    {
        let present: Vec<K> = keys.into_iter().flatten().collect();
        let count = present.len();
        let unique = present.into_iter().collect::<HashSet<K>>().len();
        ColumnProfile {
            column: column.to_string(),
            count,
            unique,
            missing: total - count,
        }
    }
}

// Float columns are compared by bit pattern; NaN counts as missing.
fn float_key(value: Option<f64>) -> Option<u64> {
    value.filter(|v| !v.is_nan()).map(|v| (v + 0.0).to_bits())
}

/// Profile every input column, in CSV header order.
pub fn profile_columns(observations: &[Observation]) -> Vec<ColumnProfile> {
    let total = observations.len();
    vec![
        ColumnProfile::from_keys("date", total, observations.iter().map(|o| Some(o.date))),
        ColumnProfile::from_keys(
            "station_id",
            total,
            observations.iter().map(|o| o.station_id.as_deref()),
        ),
        ColumnProfile::from_keys(
            "precipitation_mm",
            total,
            observations.iter().map(|o| float_key(Some(o.precipitation_mm))),
        ),
        ColumnProfile::from_keys(
            "latitude",
            total,
            observations.iter().map(|o| float_key(o.latitude)),
        ),
        ColumnProfile::from_keys(
            "longitude",
            total,
            observations.iter().map(|o| float_key(o.longitude)),
        ),
    ]
}
