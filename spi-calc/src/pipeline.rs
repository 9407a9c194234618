//! Orchestration of the SPI computation for a whole region and per station.
//!
//! Nothing here touches the filesystem: callers hand in cleaned observations
//! and receive the SPI series (or per-station outcomes) back.

use crate::error::SpiError;
use crate::index::{compute_spi, ZERO_FLOOR};
use crate::spi::{SpiSet, Window};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use spi_series::observation::Observation;
use spi_series::resample::{resample, Frequency};
use spi_series::station::Station;
use spi_series::time_series::TimeSeries;

/// Period the daily series is summed into. Windows of 1, 3 and 12 of these
/// periods are the monthly, quarterly and yearly SPI.
pub const SPI_FREQUENCY: Frequency = Frequency::MonthEnd;

/// Parameters of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiConfig {
    /// Replacement for non-positive sums ahead of the gamma fit.
    pub floor: f64,
}

impl Default for SpiConfig {
    fn default() -> Self {
        SpiConfig { floor: ZERO_FLOOR }
    }
}

/// Resample a daily series to month ends and compute SPI_1, SPI_3 and
/// SPI_12 from it.
///
/// The gamma distribution is fitted separately for every window.
pub fn compute_spi_set(daily: &TimeSeries, config: &SpiConfig) -> Result<SpiSet, SpiError> {
    let resampled = resample(daily, SPI_FREQUENCY)?;
    let mut set = SpiSet::default();
    for window in Window::ALL {
        *set.get_mut(window) = compute_spi(&resampled, window.periods(), config.floor)?;
    }
    Ok(set)
}

/// Region mode: one SPI set over the combined series of all observations.
///
/// Observations sharing a date are summed into the region total. Any
/// failure is returned to the caller as the result of the run.
pub fn compute_region(observations: &[Observation], config: &SpiConfig) -> Result<SpiSet, SpiError> {
    let daily = TimeSeries::from_observations(observations);
    info!("Calculating SPI over {} days", daily.len());
    let set = compute_spi_set(&daily, config)?;
    for (window, series) in set.iter() {
        let out_of_range = series.out_of_range_count();
        if out_of_range > 0 {
            warn!("{}: {} values outside every SPI class", window, out_of_range);
        }
    }
    info!("SPI calculated.");
    Ok(set)
}

/// Mean SPI of one station with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAggregate {
    pub station_id: String,
    pub spi_1: f64,
    pub spi_3: f64,
    pub spi_12: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl StationAggregate {
    pub fn new(station: &Station, set: &SpiSet) -> Self {
        let mean = |w: Window| set.get(w).mean().unwrap_or(f64::NAN);
        StationAggregate {
            station_id: station.station_id.clone(),
            spi_1: mean(Window::Monthly),
            spi_3: mean(Window::Quarterly),
            spi_12: mean(Window::Yearly),
            lat: station.latitude,
            lon: station.longitude,
        }
    }
}

/// What happened to a single station.
#[derive(Debug, Clone, PartialEq)]
pub enum StationOutcome {
    Computed { station: Station, spi: SpiSet },
    Skipped { station: Station, error: SpiError },
}

impl StationOutcome {
    pub fn station(&self) -> &Station {
        match self {
            StationOutcome::Computed { station, .. } => station,
            StationOutcome::Skipped { station, .. } => station,
        }
    }
}

/// Outcomes of a per-station run, in station order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationsReport {
    pub outcomes: Vec<StationOutcome>,
}

impl StationsReport {
    /// One aggregate row per successfully computed station.
    pub fn aggregates(&self) -> Vec<StationAggregate> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                StationOutcome::Computed { station, spi } => {
                    Some(StationAggregate::new(station, spi))
                }
                StationOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<(&Station, &SpiError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                StationOutcome::Skipped { station, error } => Some((station, error)),
                StationOutcome::Computed { .. } => None,
            })
            .collect()
    }
}

/// Per-station mode: the region computation repeated on each station's own
/// records. A station whose computation fails is logged and skipped; the run
/// continues with the next one.
pub fn compute_stations(observations: &[Observation], config: &SpiConfig) -> StationsReport {
    let stations = Station::collect_stations(observations);
    let by_station = Observation::vector_to_hashmap(observations);
    info!("Calculating SPI for {} stations", stations.len());

    let mut report = StationsReport::default();
    for station in stations {
        let records = by_station
            .get(&station.station_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let daily = TimeSeries::from_observations(records);
        let outcome = match compute_spi_set(&daily, config) {
            Ok(spi) => StationOutcome::Computed { station, spi },
            Err(error) => {
                warn!("Skipping station {}: {}", station.station_id, error);
                StationOutcome::Skipped { station, error }
            }
        };
        report.outcomes.push(outcome);
    }
    info!(
        "SPI calculated for {} stations, {} skipped",
        report.outcomes.len() - report.skipped().len(),
        report.skipped().len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Daily records for `years` full years starting 2000-01-01. Each day gets
    /// a value derived from its position so months differ.
    fn daily_station(station: &str, years: i32, lat: f64, factor: f64) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2000 + years - 1, 12, 31).unwrap();
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .enumerate()
            .map(|(i, date)| Observation {
                date,
                station_id: Some(station.to_string()),
                precipitation_mm: factor * ((i * 37 % 11) as f64 / 4.0 + (i / 30 % 5) as f64),
                latitude: Some(lat),
                longitude: Some(19.9),
            })
            .collect()
    }

    #[test]
    fn test_compute_region() {
        let observations = daily_station("A", 3, 50.0, 1.0);
        let set = compute_region(&observations, &SpiConfig::default()).unwrap();
        assert_eq!(set.spi_1.len(), 36);
        assert_eq!(set.spi_3.len(), 34);
        assert_eq!(set.spi_12.len(), 25);
        assert_eq!(
            set.spi_12.dates()[0],
            NaiveDate::from_ymd_opt(2000, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_compute_region_always_resamples_to_month_ends() {
        let observations = daily_station("A", 6, 50.0, 1.0);
        let set = compute_region(&observations, &SpiConfig::default()).unwrap();
        assert_eq!(set.spi_1.len(), 72);
        assert_eq!(set.spi_12.len(), 61);
        assert_eq!(
            set.spi_1.dates()[1],
            NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()
        );
        assert_eq!(
            set.spi_12.dates()[60],
            NaiveDate::from_ymd_opt(2005, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_compute_region_insufficient_data_is_terminal() {
        let observations = daily_station("A", 1, 50.0, 1.0);
        let result = compute_region(&observations, &SpiConfig::default());
        assert_eq!(
            result,
            Err(SpiError::InsufficientData {
                available: 1,
                required: 2
            })
        );
    }

    #[test]
    fn test_compute_stations_skips_failures() {
        let mut observations = daily_station("A", 3, 50.0, 1.0);
        observations.extend(daily_station("B", 1, 49.0, 2.0));
        observations.extend(daily_station("C", 3, 51.0, 3.0));

        let report = compute_stations(&observations, &SpiConfig::default());
        assert_eq!(report.outcomes.len(), 3);

        let skipped = report.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0.station_id, "B");
        assert!(matches!(skipped[0].1, SpiError::InsufficientData { .. }));

        let aggregates = report.aggregates();
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].station_id, "A");
        assert_eq!(aggregates[0].lat, Some(50.0));
        assert_eq!(aggregates[1].station_id, "C");
        assert!(aggregates[1].spi_1.is_finite());
        assert!(aggregates[1].spi_12.is_finite());
    }

    #[test]
    fn test_compute_stations_skips_fit_divergence() {
        // One record of 10 mm per month: every monthly sum is identical.
        let flat: Vec<Observation> = (2000..2003)
            .flat_map(|year| (1..=12u32).map(move |month| (year, month)))
            .map(|(year, month)| Observation {
                date: NaiveDate::from_ymd_opt(year, month, 15).unwrap(),
                station_id: Some("FLAT".to_string()),
                precipitation_mm: 10.0,
                latitude: Some(49.0),
                longitude: Some(20.0),
            })
            .collect();
        let mut observations = daily_station("A", 3, 50.0, 1.0);
        observations.extend(flat);
        observations.extend(daily_station("C", 3, 51.0, 3.0));

        let report = compute_stations(&observations, &SpiConfig::default());
        assert_eq!(report.outcomes.len(), 3);

        let skipped = report.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0.station_id, "FLAT");
        assert!(matches!(skipped[0].1, SpiError::FitDivergence(_)));

        let ids: Vec<String> = report
            .aggregates()
            .into_iter()
            .map(|a| a.station_id)
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn test_stations_are_fitted_independently() {
        // Station C is station A scaled by 3; each is fitted on its own
        // climatology so both produce the same index values.
        let mut observations = daily_station("A", 3, 50.0, 1.0);
        observations.extend(daily_station("C", 3, 51.0, 3.0));
        let report = compute_stations(&observations, &SpiConfig::default());
        let sets: Vec<&SpiSet> = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                StationOutcome::Computed { spi, .. } => Some(spi),
                _ => None,
            })
            .collect();
        assert_eq!(sets.len(), 2);
        for (a, c) in sets[0].spi_1.values().iter().zip(sets[1].spi_1.values()) {
            assert!((a - c).abs() < 1e-6, "{} vs {}", a, c);
        }
    }

    #[test]
    fn test_station_with_missing_values_is_skipped() {
        let mut observations = daily_station("A", 2, 50.0, 1.0);
        observations[10].precipitation_mm = f64::NAN;
        let report = compute_stations(&observations, &SpiConfig::default());
        assert_eq!(report.aggregates().len(), 0);
        assert!(matches!(report.skipped()[0].1, SpiError::Series(_)));
        assert_eq!(report.outcomes[0].station().station_id, "A");
    }
}
