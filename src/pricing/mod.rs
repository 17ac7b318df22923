//! Price and dividend-yield enrichment
//!
//! Builds the two read-only lookup maps the pipeline joins against:
//! symbol → latest close and symbol → dividend yield. Failures here are
//! the degraded tier: a symbol the provider cannot answer for maps to
//! `None` and the run continues.

pub mod yahoo;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{info, warn};

/// Fetch the latest close for each symbol over a trailing calendar
/// window.
///
/// One batched request covers the whole symbol set; a single-symbol set
/// goes through the chart endpoint instead, whose response is not keyed
/// by symbol. Either way the result is one map entry per requested
/// symbol, `None` where no price could be obtained. An empty symbol set
/// returns an empty map without touching the network.
pub async fn fetch_prices(
    client: &Client,
    symbols: &[String],
    window_days: i64,
) -> HashMap<String, Option<f64>> {
    if symbols.is_empty() {
        return HashMap::new();
    }

    let fetched = if symbols.len() == 1 {
        match yahoo::fetch_single_close(client, &symbols[0], window_days).await {
            Ok(close) => attribute_single_close(&symbols[0], close),
            Err(e) => {
                warn!("Price lookup failed for {}: {:#}", symbols[0], e);
                HashMap::new()
            }
        }
    } else {
        match yahoo::fetch_batch_closes(client, symbols, window_days).await {
            Ok(closes) => closes,
            Err(e) => {
                warn!("Batched price lookup failed: {:#}", e);
                HashMap::new()
            }
        }
    };

    normalize_prices(symbols, &fetched)
}

/// Key an unkeyed chart series by the one symbol that was requested.
fn attribute_single_close(symbol: &str, close: Option<f64>) -> HashMap<String, Option<f64>> {
    HashMap::from([(symbol.to_string(), close)])
}

/// One entry per requested symbol: a symbol the provider did not echo
/// back is the same as one it answered `None` for.
fn normalize_prices(
    symbols: &[String],
    fetched: &HashMap<String, Option<f64>>,
) -> HashMap<String, Option<f64>> {
    symbols
        .iter()
        .map(|symbol| {
            let close = fetched.get(symbol).copied().flatten();
            (symbol.clone(), close)
        })
        .collect()
}

/// Fetch the dividend yield for each symbol, one request per symbol.
///
/// Latency scales linearly with the symbol count; the progress bar is
/// there because a full two-index run is on the order of 900 sequential
/// requests. Per-symbol failures degrade that symbol to `None` and the
/// loop moves on.
pub async fn fetch_dividend_yields(
    client: &Client,
    symbols: &[String],
    quiet: bool,
) -> HashMap<String, Option<f64>> {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(symbols.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("Fetching dividend yields");
        bar
    };

    let mut yields = HashMap::new();

    for symbol in symbols {
        let value = match yahoo::fetch_dividend_yield(client, symbol).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Dividend yield lookup failed for {}: {:#}", symbol, e);
                None
            }
        };
        yields.insert(symbol.clone(), value);
        bar.inc(1);
    }

    bar.finish_and_clear();
    info!("Fetched dividend yields for {} symbols", symbols.len());

    yields
}
