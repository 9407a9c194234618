use chrono::naive::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use spi_utils::dates::parse_date;
use std::collections::HashMap;

/// Header of the daily precipitation CSV accepted by [`Observation::parse_precipitation_csv`].
pub const CSV_HEADER: &str = "date,station_id,precipitation_mm,latitude,longitude";

/// A single daily precipitation record.
///
/// `precipitation_mm` is NaN when the source cell was empty or not a number;
/// those gaps are resolved by [`crate::preprocess`] before any resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub station_id: Option<String>,
    pub precipitation_mm: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Observation {
    /// Create a region-level observation without station metadata.
    pub fn new(date: NaiveDate, precipitation_mm: f64) -> Self {
        Observation {
            date,
            station_id: None,
            precipitation_mm,
            latitude: None,
            longitude: None,
        }
    }

    /// Returns true when the precipitation value is missing.
    pub fn is_missing(&self) -> bool {
        self.precipitation_mm.is_nan()
    }

    /// Parse a daily precipitation CSV string into Observations.
    ///
    /// Expected format (with headers): `date,station_id,precipitation_mm,latitude,longitude`
    ///
    /// Only `date` is mandatory. Rows may stop after the precipitation column;
    /// empty station or coordinate cells become `None`, and empty or
    /// non-numeric precipitation cells become NaN.
    ///
    /// # Example CSV
    /// ```text
    /// date,station_id,precipitation_mm,latitude,longitude
    /// 2020-01-01,KRAKOW,1.2,50.07,19.80
    /// 2020-01-02,KRAKOW,,50.07,19.80
    /// ```
    pub fn parse_precipitation_csv(csv_data: &str) -> anyhow::Result<Vec<Observation>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut observations = Vec::new();
        let mut missing = 0u32;
        for (line, result) in rdr.records().enumerate() {
            let record = result?;
            let observation = Observation::try_from(&record)
                .map_err(|e| anyhow::anyhow!("row {}: {}", line + 2, e))?;
            if observation.is_missing() {
                missing += 1;
            }
            observations.push(observation);
        }
        log::info!(
            "Parsed {} precipitation records ({} missing values)",
            observations.len(),
            missing
        );
        Ok(observations)
    }

    /// Group observations by station id. Rows without a station are grouped
    /// under the empty string.
    pub fn vector_to_hashmap(observations: &[Observation]) -> HashMap<String, Vec<Observation>> {
        let mut result: HashMap<String, Vec<Observation>> = HashMap::new();
        for obs in observations {
            result
                .entry(obs.station_id.clone().unwrap_or_default())
                .or_default()
                .push(obs.clone());
        }
        result
    }
}

fn optional_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

impl TryFrom<&StringRecord> for Observation {
    type Error = anyhow::Error;

    fn try_from(record: &StringRecord) -> Result<Self, Self::Error> {
        let date_str = optional_field(record, 0)
            .ok_or_else(|| anyhow::anyhow!("missing date"))?;
        let date = parse_date(date_str)?;
        let precipitation_mm = optional_field(record, 2)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(f64::NAN);
        Ok(Observation {
            date,
            station_id: optional_field(record, 1).map(String::from),
            precipitation_mm,
            latitude: optional_field(record, 3).and_then(|s| s.parse().ok()),
            longitude: optional_field(record, 4).and_then(|s| s.parse().ok()),
        })
    }
}
