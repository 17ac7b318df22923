//! The fetch → merge → enrich pipeline
//!
//! Runs the four stages strictly in sequence: both index tables, then
//! the batched price lookup, then the per-symbol yield lookup, then the
//! join into the final constituent records.

use anyhow::Context;
use reqwest::Client;
use std::collections::HashMap;
use tracing::info;

use crate::config::{
    MIDCAP_URL, NAME_COLUMNS, PRICE_WINDOW_DAYS, SECTOR_COLUMNS, SP500_URL, SYMBOL_COLUMN,
    USER_AGENT,
};
use crate::constituents::{self, SourceTable, TableRow};
use crate::error::Result;
use crate::pricing;

/// One member of a tracked index, enriched with market data.
///
/// `price` and `dividend_yield` are `None` when the provider could not
/// supply a value; there is no sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl Constituent {
    /// Build a constituent from a source-table row plus the two lookup
    /// maps. Returns `None` for rows without a symbol.
    pub fn from_row(
        row: &TableRow<'_>,
        prices: &HashMap<String, Option<f64>>,
        yields: &HashMap<String, Option<f64>>,
    ) -> Option<Self> {
        let symbol = row.get(SYMBOL_COLUMN)?.trim().to_string();
        if symbol.is_empty() {
            return None;
        }

        let name = row.first_of(NAME_COLUMNS).unwrap_or_default().to_string();
        let sector = row.first_of(SECTOR_COLUMNS).unwrap_or_default().to_string();
        let price = prices.get(&symbol).copied().flatten();
        let dividend_yield = yields.get(&symbol).copied().flatten();

        Some(Self {
            symbol,
            name,
            sector,
            price,
            dividend_yield,
        })
    }
}

/// HTTP client shared across all pipeline stages.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Symbols of all tables concatenated, in table order, duplicates kept.
pub fn collect_symbols(tables: &[SourceTable]) -> Vec<String> {
    tables
        .iter()
        .flat_map(|table| table.rows())
        .filter_map(|row| row.get(SYMBOL_COLUMN))
        .map(|symbol| symbol.trim().to_string())
        .collect()
}

/// Join source rows against the price and yield maps.
///
/// Order follows the concatenated tables; symbols appearing in both
/// indices are not deduplicated. A symbol missing from a lookup map is
/// the same as a mapped `None`: absent.
pub fn assemble_constituents(
    tables: &[SourceTable],
    prices: &HashMap<String, Option<f64>>,
    yields: &HashMap<String, Option<f64>>,
) -> Vec<Constituent> {
    tables
        .iter()
        .flat_map(|table| table.rows())
        .filter_map(|row| Constituent::from_row(&row, prices, yields))
        .collect()
}

/// Run the whole pipeline: fetch both indices, enrich, and return the
/// final rows ready for serialization.
pub async fn build_constituents(client: &Client, quiet: bool) -> Result<Vec<Constituent>> {
    let sp500 = constituents::fetch_constituents(client, SP500_URL)
        .await
        .context("Failed to fetch S&P 500 constituents")?;
    let midcap = constituents::fetch_constituents(client, MIDCAP_URL)
        .await
        .context("Failed to fetch S&P MidCap 400 constituents")?;

    let tables = [sp500, midcap];
    let symbols = collect_symbols(&tables);
    info!("Merged {} constituents from both indices", symbols.len());

    let prices = pricing::fetch_prices(client, &symbols, PRICE_WINDOW_DAYS).await;
    let yields = pricing::fetch_dividend_yields(client, &symbols, quiet).await;

    Ok(assemble_constituents(&tables, &prices, &yields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constituents::find_symbol_table;

    fn table(html: &str) -> SourceTable {
        find_symbol_table(html, "http://test").unwrap()
    }

    #[test]
    fn merge_preserves_table_order_without_dedup() {
        let a = table(
            r#"<table>
                <tr><th>Symbol</th><th>Security</th></tr>
                <tr><td>AAA</td><td>Alpha</td></tr>
                <tr><td>BBB</td><td>Beta</td></tr>
            </table>"#,
        );
        let b = table(
            r#"<table>
                <tr><th>Symbol</th><th>Company</th></tr>
                <tr><td>BBB</td><td>Beta Again</td></tr>
                <tr><td>CCC</td><td>Gamma</td></tr>
            </table>"#,
        );

        let symbols = collect_symbols(&[a, b]);
        assert_eq!(symbols, vec!["AAA", "BBB", "BBB", "CCC"]);
    }

    #[test]
    fn rows_without_symbol_are_skipped() {
        let t = table(
            r#"<table>
                <tr><th>Symbol</th><th>Security</th></tr>
                <tr><td>AAA</td><td>Alpha</td></tr>
                <tr><td>  </td><td>Ghost Corp</td></tr>
            </table>"#,
        );

        let rows = assemble_constituents(&[t], &HashMap::new(), &HashMap::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "AAA");
    }

    #[test]
    fn missing_lookup_entries_degrade_to_absent() {
        let t = table(
            r#"<table>
                <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
                <tr><td>AAA</td><td>Alpha</td><td>Industrials</td></tr>
                <tr><td>BBB</td><td>Beta</td><td>Utilities</td></tr>
            </table>"#,
        );

        let prices = HashMap::from([("AAA".to_string(), Some(10.5))]);
        let yields = HashMap::from([("BBB".to_string(), None)]);

        let rows = assemble_constituents(&[t], &prices, &yields);
        assert_eq!(rows[0].price, Some(10.5));
        assert_eq!(rows[0].dividend_yield, None);
        assert_eq!(rows[1].price, None);
        assert_eq!(rows[1].dividend_yield, None);
    }

    #[test]
    fn name_and_sector_resolve_across_header_spellings() {
        let t = table(
            r#"<table>
                <tr><th>Symbol</th><th>Name</th><th>Sector</th></tr>
                <tr><td>DDD</td><td>Delta Co</td><td>Energy</td></tr>
            </table>"#,
        );

        let rows = assemble_constituents(&[t], &HashMap::new(), &HashMap::new());
        assert_eq!(rows[0].name, "Delta Co");
        assert_eq!(rows[0].sector, "Energy");
    }
}
