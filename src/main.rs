use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use index_snapshot::cli::Cli;
use index_snapshot::{export, pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let client = pipeline::http_client()?;
    let constituents = pipeline::build_constituents(&client, cli.quiet).await?;

    export::write_csv(&constituents, &cli.output)?;

    println!(
        "{} Wrote {} rows to {}",
        "✓".green().bold(),
        constituents.len(),
        cli.output
    );

    Ok(())
}
