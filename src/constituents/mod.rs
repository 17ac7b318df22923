//! Index constituent fetching
//!
//! Downloads an index listing page and extracts the first HTML table
//! that carries a ticker symbol column. Tables are kept in a generic
//! header + rows form so callers can resolve columns by label without
//! caring about the exact table layout on the page.

use anyhow::Context;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::SYMBOL_COLUMN;
use crate::error::{Result, SnapshotError};

/// A parsed HTML table: one header row plus data rows, cells as text.
#[derive(Debug, Clone)]
pub struct SourceTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SourceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.column_index(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(move |cells| TableRow {
            headers: &self.headers,
            cells,
        })
    }

    fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }
}

/// A single data row, cells addressed by header label.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Cell under the given header, `None` if the column is missing or
    /// the cell is empty after trimming.
    pub fn get(&self, label: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == label)?;
        let value = self.cells.get(idx)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// First non-empty cell among the candidate header labels.
    pub fn first_of(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates.iter().find_map(|label| self.get(label))
    }
}

/// Fetch an index page and return the first table with a Symbol column.
///
/// Failing to find such a table is a hard stop for the whole run; the
/// caller gets [`SnapshotError::NoMatchingTable`] and no partial data.
pub async fn fetch_constituents(client: &Client, url: &str) -> Result<SourceTable> {
    info!("Fetching index constituents from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad status from {}", url))?;

    let html = response
        .text()
        .await
        .with_context(|| format!("Failed to read body from {}", url))?;

    let table = find_symbol_table(&html, url)?;
    info!("Found constituent table with {} rows", table.len());
    Ok(table)
}

/// Parse every table on the page and return the first one carrying a
/// Symbol column.
pub fn find_symbol_table(html: &str, url: &str) -> Result<SourceTable> {
    let tables = parse_tables(html);
    debug!("Parsed {} tables from {}", tables.len(), url);

    let table = tables
        .into_iter()
        .find(|table| table.has_column(SYMBOL_COLUMN))
        .ok_or_else(|| SnapshotError::NoMatchingTable {
            url: url.to_string(),
        })?;

    debug!("Selected table with columns {:?}", table.headers());
    Ok(table)
}

/// Extract all tables from an HTML document.
///
/// The first row of each table supplies the header labels; remaining
/// rows become data rows. Cell text is the concatenated text content
/// with whitespace collapsed, which strips markup such as symbol links
/// and footnote superscripts.
pub fn parse_tables(html: &str) -> Vec<SourceTable> {
    let document = Html::parse_document(html);
    let table_sel = match Selector::parse("table") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    let row_sel = match Selector::parse("tr") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    let cell_sel = match Selector::parse("th, td") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    let mut tables = Vec::new();

    for table_node in document.select(&table_sel) {
        let mut row_iter = table_node.select(&row_sel);

        let headers: Vec<String> = match row_iter.next() {
            Some(header_row) => header_row
                .select(&cell_sel)
                .map(|cell| cell_text(&cell))
                .collect(),
            None => continue,
        };
        if headers.is_empty() {
            continue;
        }

        let rows: Vec<Vec<String>> = row_iter
            .map(|row| row.select(&cell_sel).map(|cell| cell_text(&cell)).collect())
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect();

        tables.push(SourceTable::new(headers, rows));
    }

    tables
}

fn cell_text(cell: &scraper::ElementRef<'_>) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
