//! SPI CLI - Command line tool for drought/wetness analysis of daily precipitation.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "spi-cli",
    version,
    about = "Standardized Precipitation Index toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: spi_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::debug!("Starting spi-cli");
    spi_cmd::run(cli.command)
}
