//! CSV persistence of SPI results.
//!
//! [`ResultStore`] owns a results directory. It writes the SPI tables of a
//! run and reads them back when all three are present, so a region is not
//! recomputed on every invocation.
//!
//! # Files
//!
//! - `<region>_SPI_monthly.csv`, `<region>_SPI_quarterly.csv`,
//!   `<region>_SPI_yearly.csv` - SPI_1, SPI_3 and SPI_12 as `date,spi,state`
//! - `<name>_SPI_statistics.csv` - descriptive statistics of the three series
//! - `<region>_precip_description_table.csv` - statistics of daily precipitation
//! - `<region>_precip_counts_table.csv`, `<region>_precip_unique_values_table.csv`
//!   - non-missing and distinct values per input column
//! - `<region>_missing_data.csv` - missing values per column before gap filling
//! - `<region>_stations_SPI.csv` - mean SPI per station with coordinates

mod loader;
pub mod models;
mod writer;

use spi_calc::spi::Window;
use std::path::{Path, PathBuf};

/// A directory holding result tables.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ResultStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the SPI table for `region` and `window`.
    pub fn spi_path(&self, region: &str, window: Window) -> PathBuf {
        self.dir
            .join(format!("{}_SPI_{}.csv", region, window.granularity()))
    }

    pub fn statistics_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_SPI_statistics.csv", name))
    }

    pub fn description_path(&self, region: &str) -> PathBuf {
        self.dir
            .join(format!("{}_precip_description_table.csv", region))
    }

    pub fn counts_path(&self, region: &str) -> PathBuf {
        self.dir.join(format!("{}_precip_counts_table.csv", region))
    }

    pub fn unique_values_path(&self, region: &str) -> PathBuf {
        self.dir
            .join(format!("{}_precip_unique_values_table.csv", region))
    }

    pub fn missing_data_path(&self, region: &str) -> PathBuf {
        self.dir.join(format!("{}_missing_data.csv", region))
    }

    pub fn stations_path(&self, region: &str) -> PathBuf {
        self.dir.join(format!("{}_stations_SPI.csv", region))
    }

    /// True when all three SPI tables of `region` exist.
    pub fn has_spi_set(&self, region: &str) -> bool {
        Window::ALL
            .iter()
            .all(|w| self.spi_path(region, *w).exists())
    }
}
