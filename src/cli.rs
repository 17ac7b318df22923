use clap::Parser;

use crate::config::DEFAULT_OUTPUT;

#[derive(Parser)]
#[command(name = "index-snapshot")]
#[command(
    version,
    about = "Export S&P 500 and S&P MidCap 400 constituents to CSV"
)]
#[command(
    long_about = "Download the current S&P 500 and S&P MidCap 400 constituent lists, enrich each symbol with a recent closing price and dividend yield from Yahoo Finance, and write the combined table to a CSV file."
)]
pub struct Cli {
    /// Path to write the CSV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
