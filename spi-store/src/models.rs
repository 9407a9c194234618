//! Row structs of the result CSV files.

use serde::{Deserialize, Serialize};

/// Header of an SPI series table.
pub const SPI_HEADER: [&str; 3] = ["date", "spi", "state"];

/// Header of the station aggregate table.
pub const STATION_HEADER: [&str; 6] = ["station_id", "SPI_1", "SPI_3", "SPI_12", "lat", "lon"];

/// One row of an SPI series table: `date,spi,state`.
///
/// `spi` holds the value rounded to display precision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpiRow {
    pub date: String,
    pub spi: f64,
    pub state: String,
}

/// One row of the station aggregate table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationRow {
    pub station_id: String,
    #[serde(rename = "SPI_1")]
    pub spi_1: f64,
    #[serde(rename = "SPI_3")]
    pub spi_3: f64,
    #[serde(rename = "SPI_12")]
    pub spi_12: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}
