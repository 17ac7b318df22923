use anyhow::{anyhow, Context};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::YAHOO_BASE_URL;
use crate::error::Result;

/// Yahoo Finance chart response (single-symbol quote history)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

/// Yahoo Finance spark response (multi-symbol quote history, keyed by symbol)
#[derive(Debug, Deserialize)]
struct YahooSparkResponse {
    spark: SparkData,
}

#[derive(Debug, Deserialize)]
struct SparkData {
    result: Option<Vec<SparkResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct SparkResult {
    symbol: String,
    response: Option<Vec<ChartResult>>,
}

/// Yahoo Finance quoteSummary response (per-symbol metadata)
#[derive(Debug, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "trailingAnnualDividendYield")]
    trailing_annual_dividend_yield: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

/// Fetch the latest close for a single symbol over a trailing window.
///
/// The chart endpoint response is not keyed by symbol; the returned
/// series belongs to the one requested symbol. `Ok(None)` means the
/// provider answered but had no usable close in the window.
pub async fn fetch_single_close(
    client: &Client,
    symbol: &str,
    window_days: i64,
) -> Result<Option<f64>> {
    info!("Fetching close for {} from Yahoo Finance", symbol);

    let to = Utc::now();
    let from = to - Duration::days(window_days);
    let url = format!(
        "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
        YAHOO_BASE_URL,
        symbol,
        from.timestamp(),
        to.timestamp()
    );

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to send request to Yahoo Finance")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Yahoo Finance returned error status: {}",
            response.status()
        ));
    }

    let body = response
        .text()
        .await
        .context("Failed to read Yahoo Finance chart response")?;

    parse_chart_close(&body)
}

/// Parse a chart payload and extract its latest close.
///
/// The payload carries a single unkeyed series; attributing it to the
/// requested symbol is the caller's job.
pub(crate) fn parse_chart_close(body: &str) -> Result<Option<f64>> {
    let data: YahooChartResponse =
        serde_json::from_str(body).context("Failed to parse Yahoo Finance chart response")?;

    if let Some(error) = data.chart.error {
        return Err(anyhow!(
            "Yahoo Finance API error: {} - {}",
            error.code,
            error.description
        ));
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("No data returned from Yahoo Finance"))?;

    Ok(last_close(&result))
}

/// Fetch latest closes for several symbols in one spark request.
///
/// The spark endpoint keys each series by symbol. Symbols the provider
/// does not echo back are simply missing from the returned map; a
/// per-symbol series without a usable close maps to `None`.
pub async fn fetch_batch_closes(
    client: &Client,
    symbols: &[String],
    window_days: i64,
) -> Result<HashMap<String, Option<f64>>> {
    info!(
        "Fetching closes for {} symbols from Yahoo Finance",
        symbols.len()
    );

    let url = format!(
        "{}/v8/finance/spark?symbols={}&range={}d&interval=1d",
        YAHOO_BASE_URL,
        symbols.join(","),
        window_days
    );

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to send request to Yahoo Finance")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Yahoo Finance returned error status: {}",
            response.status()
        ));
    }

    let data: YahooSparkResponse = response
        .json()
        .await
        .context("Failed to parse Yahoo Finance spark response")?;

    extract_batch_closes(data)
}

fn extract_batch_closes(data: YahooSparkResponse) -> Result<HashMap<String, Option<f64>>> {
    if let Some(error) = data.spark.error {
        return Err(anyhow!(
            "Yahoo Finance API error: {} - {}",
            error.code,
            error.description
        ));
    }

    let results = data.spark.result.unwrap_or_default();
    let mut closes = HashMap::new();

    for entry in results {
        let close = entry
            .response
            .as_deref()
            .and_then(|series| series.first())
            .and_then(last_close);
        debug!("Latest close for {}: {:?}", entry.symbol, close);
        closes.insert(entry.symbol, close);
    }

    Ok(closes)
}

/// Fetch the dividend yield for one symbol, as a percentage.
///
/// Reads `summaryDetail.dividendYield`, falling back to
/// `summaryDetail.trailingAnnualDividendYield`; the raw fraction is
/// multiplied by 100. `Ok(None)` means the provider answered but
/// reports no yield for the instrument.
pub async fn fetch_dividend_yield(client: &Client, symbol: &str) -> Result<Option<f64>> {
    debug!("Fetching dividend yield for {} from Yahoo Finance", symbol);

    let url = format!(
        "{}/v10/finance/quoteSummary/{}?modules=summaryDetail",
        YAHOO_BASE_URL, symbol
    );

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to send request to Yahoo Finance")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Yahoo Finance returned error status: {}",
            response.status()
        ));
    }

    let data: YahooQuoteSummaryResponse = response
        .json()
        .await
        .context("Failed to parse Yahoo Finance quoteSummary response")?;

    extract_dividend_yield(data)
}

fn extract_dividend_yield(data: YahooQuoteSummaryResponse) -> Result<Option<f64>> {
    if let Some(error) = data.quote_summary.error {
        return Err(anyhow!(
            "Yahoo Finance API error: {} - {}",
            error.code,
            error.description
        ));
    }

    let detail = data
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.summary_detail);

    let raw = detail.and_then(|d| {
        d.dividend_yield
            .and_then(|v| v.raw)
            .or_else(|| d.trailing_annual_dividend_yield.and_then(|v| v.raw))
    });

    Ok(raw.map(|fraction| fraction * 100.0))
}

/// Last non-missing close of a chart series.
fn last_close(result: &ChartResult) -> Option<f64> {
    let quote = result.indicators.quote.first()?;
    let closes = quote.close.as_ref()?;
    closes
        .iter()
        .rev()
        .find_map(|&value| value)
        .filter(|value| value.is_finite())
}
