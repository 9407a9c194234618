//! Command implementations for the SPI CLI.
//!
//! Provides subcommands for computing the SPI of a whole region (with a CSV
//! cache of previous results), for every station of a region, and for
//! classifying a single value.

use clap::Subcommand;
use spi_calc::pipeline::SpiConfig;
use spi_series::observation::Observation;
use spi_series::preprocess::preprocess;

pub mod classify;
pub mod region;
pub mod stations;

#[derive(Subcommand)]
pub enum Command {
    /// Compute SPI_1, SPI_3 and SPI_12 for the combined series of a region
    Region {
        /// Daily precipitation CSV (date,station_id,precipitation_mm,latitude,longitude)
        #[arg(short = 'i', long)]
        input: String,

        /// Region name used in result file names
        #[arg(short = 'r', long)]
        region: String,

        /// Directory for result tables and the SPI cache
        #[arg(short = 'o', long, default_value = "results")]
        results_dir: String,

        /// Recompute even when cached SPI tables exist
        #[arg(long)]
        force: bool,
    },

    /// Compute SPI for every station of a region and their mean values
    Stations {
        /// Daily precipitation CSV (date,station_id,precipitation_mm,latitude,longitude)
        #[arg(short = 'i', long)]
        input: String,

        /// Region name used in result file names
        #[arg(short = 'r', long)]
        region: String,

        /// Directory for result tables
        #[arg(short = 'o', long, default_value = "results")]
        results_dir: String,
    },

    /// Print the drought/wetness class of an SPI value
    Classify {
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Region {
            input,
            region,
            results_dir,
            force,
        } => region::run_region(&input, &region, &results_dir, force, &SpiConfig::default()),
        Command::Stations {
            input,
            region,
            results_dir,
        } => stations::run_stations(&input, &region, &results_dir, &SpiConfig::default()),
        Command::Classify { value } => {
            println!("{}", classify::run_classify(value));
            Ok(())
        }
    }
}

/// Read a daily precipitation CSV as is.
pub fn read_observations(input: &str) -> anyhow::Result<Vec<Observation>> {
    let csv_data = std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input, e))?;
    let observations = Observation::parse_precipitation_csv(&csv_data)?;
    if observations.is_empty() {
        anyhow::bail!("{} contains no precipitation records", input);
    }
    Ok(observations)
}

/// Read a daily precipitation CSV and clean it for the pipeline.
pub fn load_observations(input: &str) -> anyhow::Result<Vec<Observation>> {
    Ok(preprocess(&read_observations(input)?))
}
