//! CSV serialization of the enriched constituent table

use anyhow::Context;
use csv::WriterBuilder;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::pipeline::Constituent;

const HEADERS: [&str; 5] = ["Symbol", "Name", "Sector", "Price", "Dividend Yield"];

/// Write constituents to a CSV file, overwriting any existing file.
///
/// Columns are fixed in [`HEADERS`] order; absent price or yield values
/// render as empty cells rather than a sentinel.
pub fn write_csv<P: AsRef<Path>>(constituents: &[Constituent], output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    info!("Writing {} constituents to {:?}", constituents.len(), path);

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create output file {:?}", path))?;

    writer
        .write_record(HEADERS)
        .context("Failed to write CSV header")?;

    for constituent in constituents {
        let price = format_optional(constituent.price);
        let dividend_yield = format_optional(constituent.dividend_yield);
        writer
            .write_record([
                constituent.symbol.as_str(),
                constituent.name.as_str(),
                constituent.sector.as_str(),
                price.as_str(),
                dividend_yield.as_str(),
            ])
            .with_context(|| format!("Failed to write row for {}", constituent.symbol))?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
