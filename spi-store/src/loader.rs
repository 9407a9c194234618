//! Reading cached SPI tables back into memory.

use crate::models::SpiRow;
use crate::ResultStore;
use spi_calc::classify::Classification;
use spi_calc::spi::{SpiRecord, SpiSeries, SpiSet, Window};
use spi_utils::dates::parse_date;
use std::path::Path;

impl ResultStore {
    /// Load an SPI table written by [`ResultStore::save_spi_series`].
    ///
    /// Values come back at the precision they were stored with (2 decimals).
    ///
    /// # Example CSV
    /// ```text
    /// date,spi,state
    /// 2020-01-31,1.23,Moderately wet
    /// ```
    pub fn load_spi_series(&self, path: &Path) -> anyhow::Result<SpiSeries> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let row: SpiRow = result?;
            let class = row
                .state
                .parse::<Classification>()
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            records.push(SpiRecord {
                date: parse_date(&row.date)?,
                value: row.spi,
                class,
            });
        }
        log::info!("Loaded {} SPI values from {}", records.len(), path.display());
        Ok(SpiSeries(records))
    }

    /// Load the three cached SPI tables of `region`.
    pub fn load_spi_set(&self, region: &str) -> anyhow::Result<SpiSet> {
        let mut set = SpiSet::default();
        for window in Window::ALL {
            *set.get_mut(window) = self.load_spi_series(&self.spi_path(region, window))?;
        }
        Ok(set)
    }
}
