//! Fixed endpoints and tunable constants for the snapshot pipeline.

/// Wikipedia page listing S&P 500 constituents
pub const SP500_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Wikipedia page listing S&P MidCap 400 constituents
pub const MIDCAP_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_400_companies";

/// Yahoo Finance API host
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Trailing calendar window for the closing-price lookup.
///
/// Five days is a heuristic buffer against weekends and holidays; it
/// usually contains at least one trading day but carries no hard
/// guarantee.
pub const PRICE_WINDOW_DAYS: i64 = 5;

/// Default output path when `--output` is not given
pub const DEFAULT_OUTPUT: &str = "index_constituents.csv";

/// User agent sent on every outbound request
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; IndexSnapshotBot/1.0)";

/// Header labels that identify the ticker column in a source table
pub const SYMBOL_COLUMN: &str = "Symbol";

/// Candidate header labels for the company name column, first match wins
pub const NAME_COLUMNS: &[&str] = &["Security", "Company", "Name"];

/// Candidate header labels for the sector column, first match wins
pub const SECTOR_COLUMNS: &[&str] = &["GICS Sector", "Sector"];
