//! Per-station SPI of a region.

use crate::load_observations;
use log::info;
use spi_calc::pipeline::{compute_stations, SpiConfig, StationOutcome, StationsReport};
use spi_store::ResultStore;

/// Compute the SPI of every station in the input, write a statistics table
/// per computed station and the station aggregate table of the region.
///
/// Stations that cannot be computed are reported and left out of the
/// aggregate; they do not fail the run.
pub fn run_stations(
    input: &str,
    region: &str,
    results_dir: &str,
    config: &SpiConfig,
) -> anyhow::Result<()> {
    let observations = load_observations(input)?;
    let report = compute_stations(&observations, config);
    let store = ResultStore::new(results_dir);
    save_report(&store, region, &report)?;

    for (station, error) in report.skipped() {
        println!("{}: skipped ({})", station.station_id, error);
    }
    for aggregate in report.aggregates() {
        println!(
            "{}: SPI_1 {:.2}, SPI_3 {:.2}, SPI_12 {:.2}",
            aggregate.station_id, aggregate.spi_1, aggregate.spi_3, aggregate.spi_12
        );
    }
    Ok(())
}

/// Write the per-station statistics tables and the aggregate table.
pub fn save_report(store: &ResultStore, region: &str, report: &StationsReport) -> anyhow::Result<()> {
    if report.outcomes.is_empty() {
        anyhow::bail!("No stations found in the input for {}", region);
    }
    for outcome in &report.outcomes {
        if let StationOutcome::Computed { station, spi } = outcome {
            store.save_statistics(&format!("{}-{}", station.station_id, region), spi)?;
        }
    }
    let aggregates = report.aggregates();
    store.save_station_aggregates(region, &aggregates)?;
    info!(
        "{} of {} stations aggregated for {}",
        aggregates.len(),
        report.outcomes.len(),
        region
    );
    Ok(())
}
