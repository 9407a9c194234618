use crate::models::{SpiRow, StationRow, SPI_HEADER, STATION_HEADER};
use crate::ResultStore;
use spi_calc::pipeline::StationAggregate;
use spi_calc::spi::{SpiSeries, SpiSet, Window};
use spi_calc::statistics::{Describe, DESCRIBE_ROWS};
use spi_series::profile::ColumnProfile;
use spi_utils::dates::format_date;
use spi_utils::numbers::round_display;
use std::path::Path;

fn format_stat(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

impl ResultStore {
    fn ensure_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.dir())?;
        Ok(())
    }

    /// Open `path` with `header` already written, so a table without rows
    /// still carries its column names.
    fn table_writer(
        &self,
        path: &Path,
        header: &[&str],
    ) -> anyhow::Result<csv::Writer<std::fs::File>> {
        self.ensure_dir()?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(header)?;
        Ok(wtr)
    }

    fn save_column_counts(
        &self,
        path: &Path,
        profiles: &[ColumnProfile],
        value: impl Fn(&ColumnProfile) -> usize,
    ) -> anyhow::Result<()> {
        self.ensure_dir()?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        for profile in profiles {
            wtr.write_record([profile.column.clone(), value(profile).to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write one SPI series as `date,spi,state`, values rounded to 2 decimals.
    pub fn save_spi_series(&self, path: &Path, series: &SpiSeries) -> anyhow::Result<()> {
        let mut wtr = self.table_writer(path, &SPI_HEADER)?;
        for record in &series.0 {
            wtr.serialize(SpiRow {
                date: format_date(&record.date),
                spi: round_display(record.value),
                state: record.class.to_string(),
            })?;
        }
        wtr.flush()?;
        log::info!("{} saved ({} rows)", path.display(), series.len());
        Ok(())
    }

    /// Write the three SPI tables of `region`.
    pub fn save_spi_set(&self, region: &str, set: &SpiSet) -> anyhow::Result<()> {
        for (window, series) in set.iter() {
            self.save_spi_series(&self.spi_path(region, window), series)?;
        }
        Ok(())
    }

    /// Write descriptive statistics of SPI_1, SPI_3 and SPI_12 side by side.
    ///
    /// Values are described at the 2-decimal precision of the SPI tables, so
    /// a fresh run and a run from cached tables write the same statistics.
    pub fn save_statistics(&self, name: &str, set: &SpiSet) -> anyhow::Result<()> {
        self.ensure_dir()?;
        let path = self.statistics_path(name);
        let described: Vec<Option<Describe>> = set
            .iter()
            .map(|(_, series)| {
                let rounded: Vec<f64> =
                    series.values().into_iter().map(round_display).collect();
                Describe::from_values(&rounded)
            })
            .collect();

        let mut wtr = csv::Writer::from_path(&path)?;
        let mut header = vec![String::new()];
        header.extend(Window::ALL.iter().map(|w| w.column()));
        wtr.write_record(&header)?;
        for (row, label) in DESCRIBE_ROWS.iter().enumerate() {
            let mut record = vec![label.to_string()];
            record.extend(described.iter().map(|d| match d {
                Some(d) => format_stat(d.row_values()[row]),
                None => String::new(),
            }));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        log::info!("Saved SPI descriptive statistics for {} in {}", name, path.display());
        Ok(())
    }

    /// Write descriptive statistics of daily precipitation values.
    pub fn save_description(&self, region: &str, values: &[f64]) -> anyhow::Result<()> {
        self.ensure_dir()?;
        let path = self.description_path(region);
        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(["", "precipitation_mm"])?;
        let described = Describe::from_values(values);
        for (row, label) in DESCRIBE_ROWS.iter().enumerate() {
            let value = described
                .map(|d| format_stat(d.row_values()[row]))
                .unwrap_or_default();
            wtr.write_record([label.to_string(), value])?;
        }
        wtr.flush()?;
        log::info!("Saved precipitation statistics for {} in {}", region, path.display());
        Ok(())
    }

    /// Write the non-missing and the distinct value count of every input
    /// column, one `column,count` row each and no header.
    pub fn save_column_tables(
        &self,
        region: &str,
        profiles: &[ColumnProfile],
    ) -> anyhow::Result<()> {
        let counts = self.counts_path(region);
        self.save_column_counts(&counts, profiles, |p| p.count)?;
        log::info!("Saved precipitation counts for {} in {}", region, counts.display());

        let unique = self.unique_values_path(region);
        self.save_column_counts(&unique, profiles, |p| p.unique)?;
        log::info!("Saved counts of unique values for {} in {}", region, unique.display());
        Ok(())
    }

    /// Write the number of missing values per input column.
    pub fn save_missing_report(
        &self,
        region: &str,
        profiles: &[ColumnProfile],
    ) -> anyhow::Result<()> {
        let path = self.missing_data_path(region);
        let mut wtr = self.table_writer(&path, &["", "missing"])?;
        for profile in profiles {
            wtr.write_record([profile.column.clone(), profile.missing.to_string()])?;
        }
        wtr.flush()?;
        log::info!("Saved missing data report for {} in {}", region, path.display());
        Ok(())
    }

    /// Write the station aggregate table, means rounded to 2 decimals.
    pub fn save_station_aggregates(
        &self,
        region: &str,
        aggregates: &[StationAggregate],
    ) -> anyhow::Result<()> {
        let path = self.stations_path(region);
        let mut wtr = self.table_writer(&path, &STATION_HEADER)?;
        for aggregate in aggregates {
            wtr.serialize(StationRow {
                station_id: aggregate.station_id.clone(),
                spi_1: round_display(aggregate.spi_1),
                spi_3: round_display(aggregate.spi_3),
                spi_12: round_display(aggregate.spi_12),
                lat: aggregate.lat,
                lon: aggregate.lon,
            })?;
        }
        wtr.flush()?;
        log::info!("Saved {} station aggregates in {}", aggregates.len(), path.display());
        Ok(())
    }
}
