//! Region-wide SPI with a cache of previously computed tables.

use crate::read_observations;
use log::info;
use spi_calc::pipeline::{compute_region, SpiConfig};
use spi_calc::spi::SpiSet;
use spi_series::preprocess::{deduplicate, preprocess};
use spi_series::profile::profile_columns;
use spi_store::ResultStore;
use spi_utils::numbers::round_display;

/// Compute (or load from cache) the SPI tables of a region, then write the
/// descriptive statistics table.
///
/// Cached tables are used when all three exist in `results_dir` and
/// `force` is not set; otherwise the input CSV is read, profiled,
/// preprocessed and the SPI is computed and cached.
pub fn run_region(
    input: &str,
    region: &str,
    results_dir: &str,
    force: bool,
    config: &SpiConfig,
) -> anyhow::Result<()> {
    let set = region_spi(input, region, results_dir, force, config)?;
    let store = ResultStore::new(results_dir);
    store.save_statistics(region, &set)?;
    for line in summary_lines(&set) {
        println!("{}", line);
    }
    Ok(())
}

/// Load the cached SPI set of `region`, or compute and cache it.
pub fn region_spi(
    input: &str,
    region: &str,
    results_dir: &str,
    force: bool,
    config: &SpiConfig,
) -> anyhow::Result<SpiSet> {
    let store = ResultStore::new(results_dir);
    if !force && store.has_spi_set(region) {
        info!("Using cached SPI tables for {} in {}", region, results_dir);
        return store.load_spi_set(region);
    }

    let raw = read_observations(input)?;
    store.save_missing_report(region, &profile_columns(&deduplicate(&raw)))?;
    let observations = preprocess(&raw);
    let daily: Vec<f64> = observations.iter().map(|o| o.precipitation_mm).collect();
    store.save_description(region, &daily)?;
    store.save_column_tables(region, &profile_columns(&observations))?;

    let set = compute_region(&observations, config)?;
    store.save_spi_set(region, &set)?;
    Ok(set)
}

/// One line per window: number of periods, mean and the latest value.
pub fn summary_lines(set: &SpiSet) -> Vec<String> {
    set.iter()
        .map(|(window, series)| match (series.0.last(), series.mean()) {
            (Some(last), Some(mean)) => format!(
                "{}: {} periods, mean {:.2}, latest {} = {:.2} ({})",
                window,
                series.len(),
                round_display(mean),
                last.date,
                round_display(last.value),
                last.class
            ),
            _ => format!("{}: no values", window),
        })
        .collect()
}
